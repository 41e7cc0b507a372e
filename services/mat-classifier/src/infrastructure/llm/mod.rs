//! 大模型客户端实现

mod openai_compatible;

pub use openai_compatible::OpenAiCompatibleClient;
