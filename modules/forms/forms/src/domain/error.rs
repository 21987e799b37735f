use forms_sdk::FormsError;
use thiserror::Error;

use crate::infra::graphql::GraphQlError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("form not found: {0}")]
    FormNotFound(String),

    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error(transparent)]
    Upstream(#[from] GraphQlError),

    #[error("submission task failed: {0}")]
    TaskJoin(String),
}

impl From<DomainError> for FormsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::FormNotFound(form_id) => Self::form_not_found(form_id),
            DomainError::FieldNotFound(field_id) => Self::field_not_found(field_id),
            DomainError::Upstream(GraphQlError::Connect(_)) => Self::Unavailable,
            DomainError::Upstream(
                GraphQlError::Unknown(message)
                | GraphQlError::Forbidden(message)
                | GraphQlError::InternalServer(message),
            ) => Self::upstream(message),
            DomainError::Upstream(GraphQlError::NotFound) => {
                Self::upstream(Some("resource not found".to_owned()))
            }
            DomainError::TaskJoin(message) => Self::internal(message),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn not_found_conditions_keep_ids() {
        let err: FormsError = DomainError::FormNotFound("f1".to_owned()).into();
        assert!(matches!(err, FormsError::FormNotFound { ref form_id } if form_id == "f1"));

        let err: FormsError = DomainError::FieldNotFound("b".to_owned()).into();
        assert!(matches!(err, FormsError::FieldNotFound { ref field_id } if field_id == "b"));
    }

    #[test]
    fn connect_is_unavailable() {
        let err: FormsError = DomainError::from(GraphQlError::Connect("refused".to_owned())).into();
        assert!(matches!(err, FormsError::Unavailable));
    }

    #[test]
    fn other_upstream_errors_keep_message() {
        for source in [
            GraphQlError::Forbidden(Some("m".to_owned())),
            GraphQlError::InternalServer(Some("m".to_owned())),
            GraphQlError::Unknown(Some("m".to_owned())),
        ] {
            let err: FormsError = DomainError::from(source).into();
            assert!(matches!(err, FormsError::Upstream { message: Some(ref m) } if m == "m"));
        }
    }

    #[test]
    fn join_failure_is_internal() {
        let err: FormsError = DomainError::TaskJoin("panicked".to_owned()).into();
        assert!(matches!(err, FormsError::Internal { .. }));
    }
}
