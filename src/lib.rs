pub mod config;
pub mod error;
pub mod state;
pub mod validation;

// Workflow stages
pub mod generate;
pub mod notify;
pub mod pages;
pub mod publish;

// External services
pub mod github;
pub mod llm;

pub mod api;

#[cfg(test)]
mod fakes;
