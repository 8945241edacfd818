// clowder - cat-themed agents composed into moderated pipelines

pub mod config;
pub mod orchestration;
