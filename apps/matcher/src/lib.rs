pub mod catalog;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod monitoring;
pub mod predictor;
pub mod ranking;
pub mod recommend;
pub mod roles;
pub mod scoring;
pub mod state;
