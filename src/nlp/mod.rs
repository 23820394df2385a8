//! NLP utilities: term extraction and stopword filtering

pub mod stopwords;
pub mod tokenizer;
