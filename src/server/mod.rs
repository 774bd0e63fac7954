//! Transport: accepts TCP clients and hands each one to the HTTP engine.

pub mod listener;
