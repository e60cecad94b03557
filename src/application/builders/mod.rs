pub mod resolver_builder;
