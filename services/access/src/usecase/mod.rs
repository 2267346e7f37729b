pub mod consume_token;
pub mod issue_token;
