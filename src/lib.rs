#![allow(clippy::collapsible_if)]
#![allow(clippy::large_enum_variant)]

pub mod cards;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod player;
pub mod rules;
pub mod service;
pub mod storage;
pub mod table;
pub mod view;
