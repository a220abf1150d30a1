use crate::models::domain::question::{NormalizedQuestion, QuestionBody};
