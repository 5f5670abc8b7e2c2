pub mod concept;
pub mod error;
pub mod grid;
pub mod ids;
pub mod question;
pub mod schema;
pub mod session;
pub mod skip;
pub mod verdict;

pub use concept::{ConceptDomain, ConceptMapping, MappingKind};
pub use error::{Result, SchemaError};
pub use grid::{GridAxisEntry, GridDefinition};
pub use ids::{ConceptCode, QuestionId, QuestionnaireId, VocabularyId};
pub use question::{
    AnswerOption, DateBounds, NumericBounds, Question, QuestionType, Questionnaire,
    QuestionnaireStatus,
};
pub use schema::Schema;
pub use session::{RecordedResponse, SessionError, SessionHistory};
pub use skip::{SkipCondition, SkipLogicRule};
pub use verdict::{Completion, Verdict};
