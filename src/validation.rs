use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::errors::BackendError;
use crate::talker::{NewTalker, Talk};

const EMAIL_REQUIRED: &str = "O campo \"email\" é obrigatório";
const EMAIL_FORMAT: &str = "O \"email\" deve ter o formato \"email@email.com\"";
const PASSWORD_REQUIRED: &str = "O campo \"password\" é obrigatório";
const PASSWORD_LENGTH: &str = "O \"password\" deve ter pelo menos 6 caracteres";
const NAME_REQUIRED: &str = "O campo \"name\" é obrigatório";
const NAME_LENGTH: &str = "O \"name\" deve ter pelo menos 3 caracteres";
const AGE_REQUIRED: &str = "O campo \"age\" é obrigatório";
const AGE_RANGE: &str = "O campo \"age\" deve ser um número inteiro igual ou maior que 18";
const TALK_REQUIRED: &str = "O campo \"talk\" é obrigatório";
const WATCHED_AT_REQUIRED: &str = "O campo \"watchedAt\" é obrigatório";
const WATCHED_AT_FORMAT: &str = "O campo \"watchedAt\" deve ter o formato \"dd/mm/aaaa\"";
const RATE_REQUIRED: &str = "O campo \"rate\" é obrigatório";
const RATE_RANGE: &str = "O campo \"rate\" deve ser um inteiro de 1 à 5";

lazy_static! {
    static ref EMAIL_SHAPE: Regex =
        Regex::new(r"^[\w.]+@[[:alnum:]]+\.[[:alpha:]]{2,}$").expect("compile email regex");
    static ref DATE_SHAPE: Regex =
        Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("compile date regex");
}

/// Runs the login validator chain, stopping at the first failure.
pub fn validate_login(payload: &Value) -> Result<(), BackendError> {
    check_email(payload)?;
    check_password(payload)?;

    Ok(())
}

/// Runs the talker validator chain, stopping at the first failure, and
/// returns the typed payload on success.
///
/// The chain checks, in order: name presence, name length, age presence,
/// age range, talk presence, watchedAt presence, watchedAt format, rate
/// presence, rate range. Every failure is a 400 with a field-specific
/// message.
pub fn validate_talker(payload: &Value) -> Result<NewTalker, BackendError> {
    let name = checked_name(payload)?;
    let age = checked_age(payload)?;
    let talk = checked_talk(payload)?;

    Ok(NewTalker::new(name, age, talk))
}

fn fail<T>(message: &str) -> Result<T, BackendError> {
    Err(BackendError::Validation(message.to_string()))
}

// Mirrors a loose presence check: null and the empty string count as
// missing, anything else as present.
fn is_blank(value: &Value) -> bool {
    value.is_null() || value.as_str().map_or(false, str::is_empty)
}

fn check_email(payload: &Value) -> Result<(), BackendError> {
    let email = match payload.get("email") {
        Some(v) if !is_blank(v) => v,
        _ => return fail(EMAIL_REQUIRED),
    };

    match email.as_str() {
        Some(s) if EMAIL_SHAPE.is_match(s) => Ok(()),
        _ => fail(EMAIL_FORMAT),
    }
}

fn check_password(payload: &Value) -> Result<(), BackendError> {
    let password = match payload.get("password") {
        Some(v) if !is_blank(v) => v,
        _ => return fail(PASSWORD_REQUIRED),
    };

    match password.as_str() {
        Some(s) if s.chars().count() > 5 => Ok(()),
        _ => fail(PASSWORD_LENGTH),
    }
}

fn checked_name(payload: &Value) -> Result<String, BackendError> {
    let name = match payload.get("name") {
        Some(v) if !is_blank(v) => v,
        _ => return fail(NAME_REQUIRED),
    };

    match name.as_str() {
        Some(s) if s.chars().count() >= 3 => Ok(s.to_string()),
        _ => fail(NAME_LENGTH),
    }
}

fn checked_age(payload: &Value) -> Result<u32, BackendError> {
    let age = match payload.get("age") {
        Some(v) if !is_blank(v) => v,
        _ => return fail(AGE_REQUIRED),
    };

    match age.as_u64() {
        Some(n) if n >= 18 => Ok(n as u32),
        _ => fail(AGE_RANGE),
    }
}

fn checked_talk(payload: &Value) -> Result<Talk, BackendError> {
    let talk = match payload.get("talk") {
        Some(v) if v.is_object() => v,
        _ => return fail(TALK_REQUIRED),
    };

    let watched_at = checked_watched_at(talk)?;
    let rate = checked_rate(talk)?;

    Ok(Talk::new(watched_at, rate))
}

fn checked_watched_at(talk: &Value) -> Result<String, BackendError> {
    let watched_at = match talk.get("watchedAt") {
        Some(v) if !is_blank(v) => v,
        _ => return fail(WATCHED_AT_REQUIRED),
    };

    match watched_at.as_str() {
        Some(s) if DATE_SHAPE.is_match(s) => Ok(s.to_string()),
        _ => fail(WATCHED_AT_FORMAT),
    }
}

// `rate` uses an explicit absence check so that 0 counts as present and
// falls through to the range rule.
fn checked_rate(talk: &Value) -> Result<u8, BackendError> {
    let rate = match talk.get("rate") {
        Some(v) if !v.is_null() => v,
        _ => return fail(RATE_REQUIRED),
    };

    match rate.as_u64() {
        Some(n) if (1..=5).contains(&n) => Ok(n as u8),
        _ => fail(RATE_RANGE),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(error: BackendError) -> String {
        format!("{}", error)
    }

    fn valid_talker() -> Value {
        json!({
            "name": "Ana Lima",
            "age": 20,
            "talk": { "watchedAt": "10/10/2020", "rate": 3 }
        })
    }

    fn with_rate(rate: Value) -> Value {
        json!({
            "name": "Ana Lima",
            "age": 20,
            "talk": { "watchedAt": "10/10/2020", "rate": rate }
        })
    }

    fn with_age(age: Value) -> Value {
        json!({
            "name": "Ana Lima",
            "age": age,
            "talk": { "watchedAt": "10/10/2020", "rate": 3 }
        })
    }

    #[test]
    fn accepts_a_valid_login() {
        let payload = json!({ "email": "a@a.com", "password": "123456" });

        assert!(validate_login(&payload).is_ok());
    }

    #[test]
    fn rejects_a_missing_email() {
        let payload = json!({ "password": "123456" });

        let error = validate_login(&payload).unwrap_err();
        assert_eq!(message(error), EMAIL_REQUIRED);
    }

    #[test]
    fn rejects_a_misshapen_email() {
        for email in &["bad", "a@a", "@a.com", "a@.com"] {
            let payload = json!({ "email": email, "password": "123456" });

            let error = validate_login(&payload).unwrap_err();
            assert_eq!(message(error), EMAIL_FORMAT);
        }
    }

    #[test]
    fn rejects_a_missing_password() {
        let payload = json!({ "email": "a@a.com", "password": "" });

        let error = validate_login(&payload).unwrap_err();
        assert_eq!(message(error), PASSWORD_REQUIRED);
    }

    #[test]
    fn rejects_a_short_password() {
        let payload = json!({ "email": "a@a.com", "password": "12345" });

        let error = validate_login(&payload).unwrap_err();
        assert_eq!(message(error), PASSWORD_LENGTH);
    }

    #[test]
    fn accepts_a_valid_talker() {
        assert!(validate_talker(&valid_talker()).is_ok());
    }

    #[test]
    fn rejects_a_missing_name() {
        let payload = json!({
            "age": 20,
            "talk": { "watchedAt": "10/10/2020", "rate": 3 }
        });

        let error = validate_talker(&payload).unwrap_err();
        assert_eq!(message(error), NAME_REQUIRED);
    }

    #[test]
    fn rejects_a_short_name() {
        let payload = json!({
            "name": "An",
            "age": 20,
            "talk": { "watchedAt": "10/10/2020", "rate": 3 }
        });

        let error = validate_talker(&payload).unwrap_err();
        assert_eq!(message(error), NAME_LENGTH);
    }

    #[test]
    fn age_eighteen_is_the_lower_bound() {
        assert!(validate_talker(&with_age(json!(18))).is_ok());

        let error = validate_talker(&with_age(json!(17))).unwrap_err();
        assert_eq!(message(error), AGE_RANGE);
    }

    #[test]
    fn rejects_a_fractional_age() {
        let error = validate_talker(&with_age(json!(18.5))).unwrap_err();
        assert_eq!(message(error), AGE_RANGE);
    }

    #[test]
    fn rejects_a_missing_talk() {
        let payload = json!({ "name": "Ana Lima", "age": 20 });

        let error = validate_talker(&payload).unwrap_err();
        assert_eq!(message(error), TALK_REQUIRED);
    }

    #[test]
    fn rejects_a_null_talk() {
        let payload = json!({ "name": "Ana Lima", "age": 20, "talk": null });

        let error = validate_talker(&payload).unwrap_err();
        assert_eq!(message(error), TALK_REQUIRED);
    }

    #[test]
    fn rejects_a_missing_watched_at() {
        let payload = json!({
            "name": "Ana Lima",
            "age": 20,
            "talk": { "rate": 3 }
        });

        let error = validate_talker(&payload).unwrap_err();
        assert_eq!(message(error), WATCHED_AT_REQUIRED);
    }

    #[test]
    fn enforces_the_watched_at_format() {
        let payload = json!({
            "name": "Ana Lima",
            "age": 20,
            "talk": { "watchedAt": "2020-12-31", "rate": 3 }
        });

        let error = validate_talker(&payload).unwrap_err();
        assert_eq!(message(error), WATCHED_AT_FORMAT);

        let payload = json!({
            "name": "Ana Lima",
            "age": 20,
            "talk": { "watchedAt": "31/12/2020", "rate": 3 }
        });

        assert!(validate_talker(&payload).is_ok());
    }

    #[test]
    fn rejects_a_missing_rate() {
        let payload = json!({
            "name": "Ana Lima",
            "age": 20,
            "talk": { "watchedAt": "10/10/2020" }
        });

        let error = validate_talker(&payload).unwrap_err();
        assert_eq!(message(error), RATE_REQUIRED);
    }

    #[test]
    fn rate_bounds_are_one_and_five() {
        assert!(validate_talker(&with_rate(json!(1))).is_ok());
        assert!(validate_talker(&with_rate(json!(5))).is_ok());

        for rate in &[0, 6] {
            let error = validate_talker(&with_rate(json!(rate))).unwrap_err();
            assert_eq!(message(error), RATE_RANGE);
        }
    }

    #[test]
    fn rate_zero_is_present_but_out_of_range() {
        // 0 must fail the range rule, not the presence rule.
        let error = validate_talker(&with_rate(json!(0))).unwrap_err();
        assert_eq!(message(error), RATE_RANGE);
    }

    #[test]
    fn rejects_a_fractional_rate() {
        let error = validate_talker(&with_rate(json!(3.5))).unwrap_err();
        assert_eq!(message(error), RATE_RANGE);
    }
}
