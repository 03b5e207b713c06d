//! kronoscope - corpus analysis backend for an investigative-journalism
//! dashboard.
//!
//! kronoscope reads a fixed corpus of text documents (news articles, email
//! headers, resumes) and powers the dashboard's data routes: word-frequency
//! ranking, retrieval-augmented question answering against a hosted model,
//! a 2-D similarity report over stored document embeddings, a static
//! entity graph, and resume lookup.
//!
//! # Quick start
//!
//! ```no_run
//! use kronoscope::{Dashboard, SourceDir, VectorDb};
//! use kronoscope::providers::{OpenAiClient, OpenAiConfig};
//! use kronoscope::service::WordcloudRequest;
//!
//! let source = SourceDir::resolve(None).unwrap();
//! let store = VectorDb::open("vectors.redb".as_ref()).unwrap();
//! let config = OpenAiConfig::from_env().unwrap();
//!
//! let dashboard = Dashboard::new(
//!     source,
//!     store,
//!     Box::new(OpenAiClient::new(config.clone())),
//!     Box::new(OpenAiClient::new(config)),
//! );
//!
//! let ranked = dashboard
//!     .wordcloud(&WordcloudRequest {
//!         folders: vec!["news".to_string()],
//!         words: None,
//!     })
//!     .unwrap();
//! for (word, count) in &ranked {
//!     println!("{word}: {count}");
//! }
//! ```

pub mod answer;
pub mod bootstrap;
pub mod corpus;
pub mod data_dir;
pub mod doc_id;
pub mod document;
pub mod error;
pub mod graph;
pub mod providers;
pub mod report;
pub mod resume;
pub mod service;
pub mod store;
pub mod tokenize;
pub mod walker;

pub use corpus::SourceDir;
pub use data_dir::DataDir;
pub use doc_id::DocumentId;
pub use error::{Error, Result};
pub use service::Dashboard;
pub use store::VectorDb;
