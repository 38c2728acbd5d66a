use super::*;

fn parse(json: &str) -> Result<UserProfile, serde_json::Error> {
    serde_json::from_str(json)
}

#[test]
fn user_profile_parses_full_payload() {
    let user = parse(
        r#"{"id":1,"username":"admin","email":"admin@reframe.example","is_staff":true,"is_superuser":false,"first_name":""}"#,
    )
    .unwrap();
    assert_eq!(
        user,
        UserProfile {
            id: 1,
            username: "admin".to_owned(),
            email: Some("admin@reframe.example".to_owned()),
            is_staff: true,
            is_superuser: false,
        }
    );
}

#[test]
fn user_profile_accepts_pk_alias_and_defaults_flags() {
    let user = parse(r#"{"pk":7,"username":"mina"}"#).unwrap();
    assert_eq!(user.id, 7);
    assert!(!user.is_staff);
    assert!(!user.is_superuser);
    assert_eq!(user.email, None);
}

#[test]
fn user_profile_rejects_missing_id() {
    assert!(parse(r#"{"username":"ghost"}"#).is_err());
}

#[test]
fn user_profile_rejects_blank_username() {
    assert!(parse(r#"{"id":3,"username":"  "}"#).is_err());
    assert!(parse(r#"{"id":3}"#).is_err());
}

#[test]
fn user_profile_rejects_mistyped_flags() {
    assert!(parse(r#"{"id":3,"username":"x","is_staff":"yes"}"#).is_err());
}

#[test]
fn is_admin_is_a_disjunction_of_both_flags() {
    let mut user = parse(r#"{"id":1,"username":"u"}"#).unwrap();
    assert!(!user.is_admin());
    user.is_staff = true;
    assert!(user.is_admin());
    user.is_staff = false;
    user.is_superuser = true;
    assert!(user.is_admin());
}

#[test]
fn login_response_prefers_access_over_key() {
    let resp: LoginResponse = serde_json::from_str(r#"{"access":"jwt","refresh":"r","key":"legacy"}"#).unwrap();
    assert_eq!(resp.into_token(), Some("jwt".to_owned()));

    let resp: LoginResponse = serde_json::from_str(r#"{"key":"legacy"}"#).unwrap();
    assert_eq!(resp.into_token(), Some("legacy".to_owned()));
}

#[test]
fn login_response_without_token_yields_none() {
    let resp: LoginResponse = serde_json::from_str(r#"{"access":""}"#).unwrap();
    assert_eq!(resp.into_token(), None);
    assert_eq!(LoginResponse::default().into_token(), None);
}

#[test]
fn registration_serializes_password_pair() {
    let body = serde_json::to_value(Registration {
        username: "mina".to_owned(),
        email: "mina@reframe.example".to_owned(),
        password1: "pw".to_owned(),
        password2: "pw".to_owned(),
    })
    .unwrap();
    assert_eq!(body["password1"], "pw");
    assert_eq!(body["password2"], "pw");
}
