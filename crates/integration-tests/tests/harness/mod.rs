pub mod config;
pub mod mock_google;

/// Service-account JSON signed with the fixture key
pub fn service_account_json(token_uri: Option<&str>) -> String {
    let mut key = serde_json::json!({
        "type": "service_account",
        "project_id": "switchyard-test",
        "private_key_id": "fixture",
        "private_key": include_str!("../fixtures/service_account_key.pem"),
        "client_email": "router@switchyard-test.iam.gserviceaccount.com",
    });

    if let Some(token_uri) = token_uri {
        key["token_uri"] = serde_json::Value::String(token_uri.to_owned());
    }

    key.to_string()
}
