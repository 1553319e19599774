pub mod activity;
pub mod auth;
pub mod project;
pub mod recent;
pub mod task;
pub mod team_member;
pub mod user;
