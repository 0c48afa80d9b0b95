//! Intelligence Repository, Aggregator, and Feedback Loop.

pub mod aggregator;
pub mod feedback;
pub mod parsers;
pub mod repository;

pub use aggregator::Aggregator;
pub use feedback::{
    FeedbackCollector, FeedbackStore, InMemoryFeedbackStore, InternalFeedbackDataProvider,
    LocalFeedbackCollector,
};
pub use parsers::{parse_csv_report, AdyenCsvParser, ReportRow, StripeCsvParser, TransactionParser};
pub use repository::IntelligenceRepository;
