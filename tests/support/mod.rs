#![allow(dead_code)]

pub mod http;
pub mod notifier;
pub mod recipes;
