//! 学习样例

use crate::domain::value_objects::ExampleId;

#[derive(Debug, Clone)]
pub struct NewLearningExample {
    pub input: String,
    pub output: String,
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct LearningExample {
    pub id: ExampleId,
    pub input: String,
    pub output: String,
    pub user_id: Option<i32>,
}
