//! Recipe ideas from the open items on the list.
//!
//! One blocking chat-completion request per call, no retry, no streaming.
//! ALWAYS run [`generate_recipe`] in a background thread!
//! Every failure after validation collapses to [`RecipeError::Failed`];
//! the specific cause only goes to the log.

use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";

/// Fewest open items a recipe can be built from
pub const MIN_INGREDIENTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("Please add at least two items to generate a recipe.")]
    NotEnoughIngredients,
    #[error(
        "Please make sure your Groq API key is set in the config file or the GROQ_API_KEY environment variable and restart basket."
    )]
    MissingApiKey,
    #[error("Sorry, I couldn't generate a recipe right now. Please try again later.")]
    Failed,
}

impl RecipeError {
    /// Popup title for this error
    pub fn title(&self) -> &'static str {
        match self {
            RecipeError::NotEnoughIngredients => "Not Enough Ingredients",
            RecipeError::MissingApiKey => "API Key Missing",
            RecipeError::Failed => "AI Error",
        }
    }
}

/// Endpoint, model and credential for one request
#[derive(Debug, Clone)]
pub struct RecipeSettings {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Transport seam for the chat-completion call
pub trait ChatBackend {
    /// POST `body` as JSON with a bearer credential and return the parsed
    /// response. Non-2xx statuses are errors.
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value>;
}

/// Blocking `ureq` transport
pub struct UreqBackend {
    agent: ureq::Agent,
}

impl UreqBackend {
    /// `timeout_secs == 0` leaves the request without a deadline
    pub fn new(timeout_secs: u64) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        Self {
            agent: builder.build(),
        }
    }
}

impl ChatBackend for UreqBackend {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let resp = self
            .agent
            .post(url)
            .set("Authorization", &format!("Bearer {}", api_key))
            .set("Content-Type", "application/json")
            .send_string(&serde_json::to_string(body)?);

        match resp {
            Ok(resp) => serde_json::from_reader(resp.into_reader())
                .context("Failed to parse chat completion response"),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                let msg: String = body.chars().take(500).collect();
                tracing::error!(status = code, body = %msg, "recipe API error body");
                anyhow::bail!("API Error: {}", code)
            }
            Err(ureq::Error::Transport(e)) => {
                anyhow::bail!("Network error: {}", e)
            }
        }
    }
}

pub fn build_prompt(ingredients: &[String]) -> String {
    format!(
        "You are a helpful recipe assistant. Generate a simple and delicious recipe using ONLY the following ingredients: {}. Assume basic pantry staples like oil, salt, and pepper are available. Provide a creative title, the ingredient list, and step-by-step instructions. Format the response nicely with clear headings.",
        ingredients.join(", ")
    )
}

pub fn build_request_body(model: &str, prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "messages": [{"role": "user", "content": prompt}],
        "model": model
    })
}

/// `choices[0].message.content`, if present and non-empty
pub fn extract_content(json: &serde_json::Value) -> Option<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Reject requests that cannot succeed before touching the network
pub fn validate<'a>(
    settings: &'a RecipeSettings,
    ingredients: &[String],
) -> Result<&'a str, RecipeError> {
    if ingredients.len() < MIN_INGREDIENTS {
        return Err(RecipeError::NotEnoughIngredients);
    }
    settings
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or(RecipeError::MissingApiKey)
}

/// Ask the model for a recipe built from `ingredients`.
/// This blocks — caller MUST run in a background thread.
pub fn generate_recipe(
    backend: &dyn ChatBackend,
    settings: &RecipeSettings,
    ingredients: &[String],
) -> Result<String, RecipeError> {
    let api_key = validate(settings, ingredients)?;

    let prompt = build_prompt(ingredients);
    let body = build_request_body(&settings.model, &prompt);

    tracing::info!(
        ingredients = ingredients.len(),
        model = %settings.model,
        "requesting recipe"
    );

    let json = backend
        .post_json(&settings.api_url, api_key, &body)
        .map_err(|e| {
            tracing::error!("Failed to generate recipe: {:#}", e);
            RecipeError::Failed
        })?;

    extract_content(&json).ok_or_else(|| {
        tracing::error!("Failed to generate recipe: the AI returned an invalid response");
        RecipeError::Failed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct FakeBackend {
        calls: Cell<usize>,
        last_request: RefCell<Option<(String, String, serde_json::Value)>>,
        response: Result<serde_json::Value, String>,
    }

    impl FakeBackend {
        fn replying(response: serde_json::Value) -> Self {
            Self {
                calls: Cell::new(0),
                last_request: RefCell::new(None),
                response: Ok(response),
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                calls: Cell::new(0),
                last_request: RefCell::new(None),
                response: Err(msg.to_string()),
            }
        }
    }

    impl ChatBackend for FakeBackend {
        fn post_json(
            &self,
            url: &str,
            api_key: &str,
            body: &serde_json::Value,
        ) -> Result<serde_json::Value> {
            self.calls.set(self.calls.get() + 1);
            *self.last_request.borrow_mut() =
                Some((url.to_string(), api_key.to_string(), body.clone()));
            match &self.response {
                Ok(v) => Ok(v.clone()),
                Err(msg) => anyhow::bail!("{}", msg),
            }
        }
    }

    fn settings(key: Option<&str>) -> RecipeSettings {
        RecipeSettings {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: key.map(|k| k.to_string()),
        }
    }

    fn ingredients(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn completion(text: &str) -> serde_json::Value {
        serde_json::json!({"choices": [{"message": {"role": "assistant", "content": text}}]})
    }

    #[test]
    fn test_too_few_ingredients_skips_network() {
        let backend = FakeBackend::replying(completion("unused"));
        for list in [ingredients(&[]), ingredients(&["Eggs"])] {
            let err = generate_recipe(&backend, &settings(Some("k")), &list).unwrap_err();
            assert_eq!(err, RecipeError::NotEnoughIngredients);
        }
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn test_missing_key_skips_network() {
        let backend = FakeBackend::replying(completion("unused"));
        let list = ingredients(&["Eggs", "Spinach"]);
        assert_eq!(
            generate_recipe(&backend, &settings(None), &list).unwrap_err(),
            RecipeError::MissingApiKey
        );
        assert_eq!(
            generate_recipe(&backend, &settings(Some("  ")), &list).unwrap_err(),
            RecipeError::MissingApiKey
        );
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn test_successful_request() {
        let backend = FakeBackend::replying(completion("# Spinach Omelette"));
        let list = ingredients(&["Eggs", "Spinach"]);
        let text = generate_recipe(&backend, &settings(Some("secret")), &list).unwrap();
        assert_eq!(text, "# Spinach Omelette");
        assert_eq!(backend.calls.get(), 1);

        let (url, key, body) = backend.last_request.borrow().clone().unwrap();
        assert_eq!(url, DEFAULT_API_URL);
        assert_eq!(key, "secret");
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "user");
        let prompt = body["messages"][0]["content"].as_str().unwrap();
        assert!(prompt.contains("ingredients: Eggs, Spinach."));
    }

    #[test]
    fn test_transport_failure_is_generic() {
        let backend = FakeBackend::failing("API Error: 401");
        let list = ingredients(&["Eggs", "Spinach"]);
        assert_eq!(
            generate_recipe(&backend, &settings(Some("k")), &list).unwrap_err(),
            RecipeError::Failed
        );
        assert_eq!(backend.calls.get(), 1);
    }

    #[test]
    fn test_bad_shape_is_generic() {
        let list = ingredients(&["Eggs", "Spinach"]);
        for response in [
            serde_json::json!({"choices": []}),
            serde_json::json!({"error": "nope"}),
            completion(""),
        ] {
            let backend = FakeBackend::replying(response);
            assert_eq!(
                generate_recipe(&backend, &settings(Some("k")), &list).unwrap_err(),
                RecipeError::Failed
            );
        }
    }

    #[test]
    fn test_error_titles() {
        assert_eq!(RecipeError::MissingApiKey.title(), "API Key Missing");
        assert_eq!(RecipeError::Failed.title(), "AI Error");
        assert!(RecipeError::Failed.to_string().starts_with("Sorry"));
    }

    // ── UreqBackend against a local one-shot HTTP server ──

    /// Answer exactly one request with `status` and `body`; the join handle
    /// yields the request head as received.
    fn serve_once(status: &str, body: &str) -> (u16, std::thread::JoinHandle<String>) {
        use std::io::{BufRead, BufReader, Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                head.push_str(&line);
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();
            stream.write_all(response.as_bytes()).unwrap();
            head
        });

        (port, handle)
    }

    fn local_settings(port: u16) -> RecipeSettings {
        RecipeSettings {
            api_url: format!("http://127.0.0.1:{}/openai/v1/chat/completions", port),
            model: DEFAULT_MODEL.to_string(),
            api_key: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_ureq_success() {
        let body = completion("Soup").to_string();
        let (port, server) = serve_once("200 OK", &body);
        let backend = UreqBackend::new(5);
        let list = ingredients(&["Leeks", "Potatoes"]);

        let result = generate_recipe(&backend, &local_settings(port), &list);
        assert_eq!(result.unwrap(), "Soup");

        let head = server.join().unwrap();
        assert!(head.starts_with("POST /openai/v1/chat/completions"));
        assert!(head.contains("Authorization: Bearer secret"));
    }

    #[test]
    fn test_ureq_error_status_is_generic() {
        let (port, server) = serve_once("500 Internal Server Error", r#"{"error":"down"}"#);
        let backend = UreqBackend::new(5);
        let list = ingredients(&["Leeks", "Potatoes"]);

        let err = generate_recipe(&backend, &local_settings(port), &list).unwrap_err();
        assert_eq!(err, RecipeError::Failed);
        server.join().unwrap();
    }

    #[test]
    fn test_ureq_garbage_body_is_generic() {
        let (port, server) = serve_once("200 OK", "<html>not json</html>");
        let backend = UreqBackend::new(5);
        let list = ingredients(&["Leeks", "Potatoes"]);

        let err = generate_recipe(&backend, &local_settings(port), &list).unwrap_err();
        assert_eq!(err, RecipeError::Failed);
        server.join().unwrap();
    }

    #[test]
    fn test_ureq_connection_refused_is_generic() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let backend = UreqBackend::new(5);
        let list = ingredients(&["Leeks", "Potatoes"]);

        let err = generate_recipe(&backend, &local_settings(port), &list).unwrap_err();
        assert_eq!(err, RecipeError::Failed);
    }
}
