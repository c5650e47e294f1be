//! Unauthenticated third-party APIs behind the fun commands

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::debug;

/// Endpoint configuration for the web-backed commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebApiConfig {
    #[serde(default = "default_joke_url")]
    pub joke_url: String,
    #[serde(default = "default_meme_url")]
    pub meme_url: String,
    #[serde(default = "default_cat_url")]
    pub cat_url: String,
    #[serde(default = "default_dog_url")]
    pub dog_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebApiConfig {
    fn default() -> Self {
        Self {
            joke_url: default_joke_url(),
            meme_url: default_meme_url(),
            cat_url: default_cat_url(),
            dog_url: default_dog_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_joke_url() -> String {
    "https://official-joke-api.appspot.com/random_joke".to_string()
}

fn default_meme_url() -> String {
    "https://meme-api.herokuapp.com/gimme".to_string()
}

fn default_cat_url() -> String {
    "https://aws.random.cat/meow".to_string()
}

fn default_dog_url() -> String {
    "https://random.dog/woof.json".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Joke {
    pub setup: String,
    pub punchline: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Meme {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatPicture {
    pub file: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DogPicture {
    pub url: String,
}

/// HTTP client for the joke, meme and animal picture APIs
#[derive(Debug, Clone)]
pub struct WebApis {
    client: reqwest::Client,
    config: WebApiConfig,
}

impl WebApis {
    pub fn new(config: WebApiConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WebApiConfig {
        &self.config
    }

    pub async fn joke(&self) -> reqwest::Result<Joke> {
        self.get_json(&self.config.joke_url).await
    }

    pub async fn meme(&self) -> reqwest::Result<Meme> {
        self.get_json(&self.config.meme_url).await
    }

    pub async fn cat(&self) -> reqwest::Result<CatPicture> {
        self.get_json(&self.config.cat_url).await
    }

    pub async fn dog(&self) -> reqwest::Result<DogPicture> {
        self.get_json(&self.config.dog_url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> reqwest::Result<T> {
        debug!("Fetching {}", url);
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn apis_for(server: &MockServer) -> WebApis {
        WebApis::new(WebApiConfig {
            joke_url: format!("{}/random_joke", server.uri()),
            meme_url: format!("{}/gimme", server.uri()),
            cat_url: format!("{}/meow", server.uri()),
            dog_url: format!("{}/woof.json", server.uri()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config_points_at_public_apis() {
        let cfg = WebApiConfig::default();
        assert!(cfg.joke_url.starts_with("https://official-joke-api"));
        assert!(cfg.dog_url.ends_with("woof.json"));
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[tokio::test]
    async fn test_joke_is_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/random_joke"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1,
                "type": "general",
                "setup": "Why?",
                "punchline": "Because."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let joke = apis_for(&server).joke().await.unwrap();
        assert_eq!(joke.setup, "Why?");
        assert_eq!(joke.punchline, "Because.");
    }

    #[tokio::test]
    async fn test_cat_reads_file_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "file": "https://cats/1.jpg" })),
            )
            .mount(&server)
            .await;

        let cat = apis_for(&server).cat().await.unwrap();
        assert_eq!(cat.file, "https://cats/1.jpg");
    }

    #[tokio::test]
    async fn test_server_error_is_err() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gimme"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(apis_for(&server).meme().await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_body_is_err() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/woof.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert!(apis_for(&server).dog().await.is_err());
    }
}
