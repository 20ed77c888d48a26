//! Parsers for operator-typed query text

pub mod graph_query_parser;
