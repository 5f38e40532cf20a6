//! Contract checks for the reqres.in CRUD sandbox.

use anyhow::Result;
use serde_json::json;

use crate::{
    http::HttpMethod,
    runner::{Check, TestCase},
};

use super::SuiteConfig;

pub const NAME: &str = "reqres";
pub const BASE_URL: &str = "https://reqres.in";
/// Public key the sandbox expects on every request.
pub const API_KEY_HEADER: (&str, &str) = ("x-api-key", "reqres-free-v1");

pub const EMAIL: &str = "eve.holt@reqres.in";
pub const LOGIN_PASSWORD: &str = "cityslicka";
pub const REGISTER_PASSWORD: &str = "pistol";
pub const TOKEN: &str = "QpwL5tke4Pnpja7X4";
pub const REGISTERED_ID: u64 = 4;
pub const SUPPORT_TEXT: &str =
    "To keep ReqRes free, contributions towards server costs are appreciated!";

const ISO_TIMESTAMP: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?Z$";

pub fn default_config() -> Result<SuiteConfig> {
    Ok(SuiteConfig::new(BASE_URL)?.with_header(API_KEY_HEADER.0, API_KEY_HEADER.1))
}

pub fn suite(config: &SuiteConfig) -> Result<Vec<TestCase>> {
    Ok(vec![
        TestCase::new(
            "login_successful",
            config
                .request(HttpMethod::Post, "/api/login")?
                .with_json_body(json!({"email": EMAIL, "password": LOGIN_PASSWORD})),
        )
        .check(Check::status(200))
        .check(Check::field("token", TOKEN)?),
        TestCase::new(
            "login_without_body",
            config.request(HttpMethod::Post, "/api/login")?,
        )
        .check(Check::status(415)),
        TestCase::new(
            "login_non_object_body",
            config
                .request(HttpMethod::Post, "/api/login")?
                .with_text_body("123"),
        )
        .check(Check::status(400))
        .check(Check::field("error", "Missing email or username")?),
        TestCase::new(
            "login_missing_password",
            config
                .request(HttpMethod::Post, "/api/login")?
                .with_json_body(json!({"email": EMAIL})),
        )
        .check(Check::status(400))
        .check(Check::field("error", "Missing password")?),
        TestCase::new(
            "register_successful",
            config
                .request(HttpMethod::Post, "/api/register")?
                .with_json_body(json!({"email": EMAIL, "password": REGISTER_PASSWORD})),
        )
        .check(Check::status(200))
        .check(Check::body_equals(
            json!({"id": REGISTERED_ID, "token": TOKEN}),
        )),
        TestCase::new(
            "get_single_user",
            config.request(HttpMethod::Get, "/api/users/2")?,
        )
        .check(Check::status(200))
        .checks([
            Check::field("data.id", 2)?,
            Check::field("data.email", "janet.weaver@reqres.in")?,
            Check::field("data.first_name", "Janet")?,
            Check::field("data.last_name", "Weaver")?,
            Check::field("support.text", SUPPORT_TEXT)?,
        ]),
        TestCase::new(
            "create_user",
            config
                .request(HttpMethod::Post, "/api/users")?
                .with_json_body(json!({"name": "Cat", "job": "walk around the house"})),
        )
        .check(Check::status(201))
        .checks([
            Check::field("name", "Cat")?,
            Check::field("job", "walk around the house")?,
            Check::field_matches("createdAt", ISO_TIMESTAMP)?,
        ]),
        TestCase::new(
            "create_user_without_body",
            config.request(HttpMethod::Post, "/api/users")?,
        )
        .check(Check::status(415)),
        TestCase::new(
            "update_user",
            config
                .request(HttpMethod::Put, "/api/users/2")?
                .with_json_body(json!({"name": "Kitty", "job": "sleep all day"})),
        )
        .check(Check::status(200))
        .checks([
            Check::field("name", "Kitty")?,
            Check::field("job", "sleep all day")?,
            Check::field_matches("updatedAt", ISO_TIMESTAMP)?,
        ]),
        TestCase::new(
            "delete_user",
            config.request(HttpMethod::Delete, "/api/users/2")?,
        )
        .check(Check::status(204))
        .check(Check::body_literal("")),
    ])
}
