//! GraphQL documents sent to the backend.
//!
//! The aliases (`tokens`, `pager`, `form`, `submission`, ...) are what the
//! response models in [`super::models`] deserialize from.

pub const LOGIN: &str = r"
mutation authLogin($username: String!, $password: String!) {
  tokens: authLogin(username: $username, password: $password) {
    access: accessToken
    refresh: refreshToken
  }
}
";

pub const LIST_FORMS: &str = r"
query listForms($start: Int, $limit: Int) {
  pager: listForms(start: $start, limit: $limit) {
    entries {
      id
      title
    }
    total
    limit
    start
  }
}
";

pub const GET_FORM: &str = r"
query getFormById($id: ID!) {
  form: getFormById(id: $id) {
    id
    title
    fields {
      id
      idx
      title
      type
      description
      required
      defaultValue
      options {
        id
        title
        value
      }
    }
  }
}
";

pub const START_SUBMISSION: &str = r"
mutation submissionStart($form: ID!, $submission: SubmissionStartInput!) {
  submission: submissionStart(form: $form, submission: $submission) {
    id
    percentageComplete
  }
}
";

pub const SUBMIT_FIELD: &str = r"
mutation submissionSetField($submission: ID!, $field: SubmissionSetFieldInput!) {
  submission: submissionSetField(submission: $submission, field: $field) {
    id
    percentageComplete
  }
}
";

pub const FINISH_SUBMISSION: &str = r"
mutation submissionFinish($submission: ID!) {
  submission: submissionFinish(submission: $submission) {
    id
    percentageComplete
  }
}
";
