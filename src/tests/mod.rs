//! End-to-end tests: the full router served on a local port in front of a
//! local upstream server.

mod cases_subscribe_test;

pub mod support;
