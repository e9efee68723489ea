//! Meal planning through a hosted text-completion model.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::http::client::JsonClient;
use crate::model::{Meal, MEAL_DAYS};

use super::ProducerError;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Turns a product list into one dinner per planned day.
#[async_trait::async_trait]
pub trait MealPlanner: Send + Sync {
    async fn plan(&self, products: &[String]) -> Result<Vec<Meal>, ProducerError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Messages API planner.
pub struct AnthropicPlanner {
    client: JsonClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl AnthropicPlanner {
    pub fn new(
        client: JsonClient,
        api_url: String,
        api_key: Option<String>,
        model: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            api_url,
            api_key,
            model,
            max_tokens,
        }
    }
}

#[async_trait::async_trait]
impl MealPlanner for AnthropicPlanner {
    async fn plan(&self, products: &[String]) -> Result<Vec<Meal>, ProducerError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProducerError::Config("planner api key is not set".to_string()))?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt(products),
            }],
        };
        let headers = [("x-api-key", api_key), ("anthropic-version", ANTHROPIC_VERSION)];
        let response: MessagesResponse = self.client.post_json(&self.api_url, &headers, &request).await?;

        let text = response
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| ProducerError::Plan("response has no text block".to_string()))?;

        parse_meals(&text)
    }
}

/// Builds the planning prompt.
pub fn prompt(products: &[String]) -> String {
    let mut example = String::from("[\n");
    for (i, day) in MEAL_DAYS.iter().enumerate() {
        let sep = if i + 1 < MEAL_DAYS.len() { "," } else { "" };
        example.push_str(&format!(
            "  {{\"day\": \"{day}\", \"name\": \"Nom du plat\", \"description\": \"Description courte en français\", \"uses\": [\"Légume{}\"]}}{sep}\n",
            i + 1
        ));
    }
    example.push(']');

    format!(
        "Tu es un chef cuisinier. Voici les légumes et produits disponibles cette semaine :\n{}\n\n\
         Propose 4 dîners variés pour lundi, mardi, mercredi et jeudi. \
         Chaque légume/produit ne doit être utilisé que dans UN SEUL dîner maximum.\n\n\
         Réponds UNIQUEMENT avec un JSON valide, sans aucun autre texte, dans ce format exact :\n{}",
        products.join(", "),
        example
    )
}

/// Returns the content of the first fenced block, without a language tag.
/// Text without fences is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let mut parts = text.split("```");
    let (Some(_), Some(fenced)) = (parts.next(), parts.next()) else {
        return text;
    };
    let fenced = fenced.trim_start();
    fenced.strip_prefix("json").unwrap_or(fenced).trim()
}

/// Parses the model answer into meals covering each planned day exactly once.
pub fn parse_meals(text: &str) -> Result<Vec<Meal>, ProducerError> {
    let body = strip_code_fences(text);
    let meals: Vec<Meal> = serde_json::from_str(body)
        .map_err(|e| ProducerError::Plan(format!("unparseable plan: {e}")))?;

    if meals.len() != MEAL_DAYS.len() {
        return Err(ProducerError::Plan(format!(
            "expected {} meals, got {}",
            MEAL_DAYS.len(),
            meals.len()
        )));
    }

    let mut seen = HashSet::new();
    for meal in &meals {
        if !MEAL_DAYS.contains(&meal.day.as_str()) {
            return Err(ProducerError::Plan(format!("unknown day label {:?}", meal.day)));
        }
        if !seen.insert(meal.day.as_str()) {
            return Err(ProducerError::Plan(format!("day {:?} planned twice", meal.day)));
        }
    }

    Ok(meals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    const PLAN: &str = r#"[
        {"day": "Lundi", "name": "Gratin", "description": "Poireaux", "uses": ["Poireaux"]},
        {"day": "Mardi", "name": "Soupe", "description": "Carottes", "uses": ["Carottes"]},
        {"day": "Mercredi", "name": "Risotto", "uses": ["Courge"]},
        {"day": "Jeudi", "name": "Salade", "description": "Betterave"}
    ]"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("Voici:\n```\n[2]\n```\nBon appétit"), "[2]");
    }

    #[test]
    fn test_parse_meals_accepts_fenced_plan() {
        let meals = parse_meals(&format!("```json\n{PLAN}\n```")).unwrap();
        let days: Vec<&str> = meals.iter().map(|m| m.day.as_str()).collect();
        assert_eq!(days, MEAL_DAYS);
        assert_eq!(meals[2].description, "");
        assert!(meals[3].uses.is_empty());
    }

    #[test]
    fn test_parse_meals_rejects_bad_plans() {
        assert!(matches!(parse_meals("pas de json"), Err(ProducerError::Plan(_))));

        let three = r#"[{"day":"Lundi","name":"a"},{"day":"Mardi","name":"b"},{"day":"Jeudi","name":"c"}]"#;
        assert!(matches!(parse_meals(three), Err(ProducerError::Plan(_))));

        let friday = PLAN.replace("Jeudi", "Vendredi");
        assert!(matches!(parse_meals(&friday), Err(ProducerError::Plan(_))));

        let twice = PLAN.replace("Jeudi", "Lundi");
        assert!(matches!(parse_meals(&twice), Err(ProducerError::Plan(_))));
    }

    #[test]
    fn test_prompt_lists_products_and_days() {
        let p = prompt(&["Poireaux".to_string(), "Carottes".to_string()]);
        assert!(p.contains("Poireaux, Carottes"));
        for day in MEAL_DAYS {
            assert!(p.contains(&format!("\"day\": \"{day}\"")));
        }
        let example = strip_code_fences(&p[p.find('[').unwrap()..]);
        let meals: Vec<Meal> = serde_json::from_str(example).unwrap();
        assert_eq!(meals.len(), 4);
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn planner(url: String, api_key: Option<&str>) -> AnthropicPlanner {
        let client = JsonClient::new(crate::http::client::create_client(), Duration::from_secs(5));
        AnthropicPlanner::new(client, url, api_key.map(str::to_string), "test-model".to_string(), 512)
    }

    fn products() -> Vec<String> {
        vec!["Poireaux".to_string(), "Carottes".to_string()]
    }

    #[tokio::test]
    async fn test_plan_sends_messages_request() {
        let received: Arc<Mutex<Vec<(HeaderMap, Value)>>> = Arc::new(Mutex::new(Vec::new()));
        let captured = received.clone();
        let router = Router::new().route(
            "/v1/messages",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.lock().push((headers, body));
                    Json(json!({
                        "content": [
                            {"type": "thinking", "thinking": "..."},
                            {"type": "text", "text": format!("Voici le menu :\n```json\n{PLAN}\n```")}
                        ]
                    }))
                }
            }),
        );
        let base = serve(router).await;

        let meals = planner(format!("{}/v1/messages", base), Some("sk-test"))
            .plan(&products())
            .await
            .unwrap();
        let days: Vec<&str> = meals.iter().map(|m| m.day.as_str()).collect();
        assert_eq!(days, MEAL_DAYS);

        let received = received.lock();
        assert_eq!(received.len(), 1);
        let (headers, body) = &received[0];
        assert_eq!(headers["x-api-key"], "sk-test");
        assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], prompt(&products()));
    }

    #[tokio::test]
    async fn test_plan_without_text_block_fails() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async {
                Json(json!({
                    "content": [{"type": "tool_use", "id": "t1", "name": "lookup", "input": {}}]
                }))
            }),
        );
        let base = serve(router).await;

        let got = planner(format!("{}/v1/messages", base), Some("sk-test"))
            .plan(&products())
            .await;
        assert!(matches!(got, Err(ProducerError::Plan(_))), "{got:?}");
    }

    #[tokio::test]
    async fn test_plan_rejects_malformed_text() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async { Json(json!({"content": [{"type": "text", "text": "Désolé, je ne peux pas."}]})) }),
        );
        let base = serve(router).await;

        let got = planner(format!("{}/v1/messages", base), Some("sk-test"))
            .plan(&products())
            .await;
        assert!(matches!(got, Err(ProducerError::Plan(_))), "{got:?}");
    }

    #[tokio::test]
    async fn test_plan_without_api_key_is_a_config_error() {
        // nothing listens here; the key check comes before any request
        let got = planner("http://127.0.0.1:1/v1/messages".to_string(), None)
            .plan(&products())
            .await;
        assert!(matches!(got, Err(ProducerError::Config(_))), "{got:?}");
    }
}
