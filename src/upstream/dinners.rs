//! Weekly dinners producer: product list in, four planned dinners out.

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::http::client::JsonClient;
use crate::model::WeeklyPlan;
use crate::time::Clock;
use crate::workers::Producer;

use super::planner::MealPlanner;
use super::ProducerError;

/// Supplies the product names of the next grocery delivery.
#[async_trait::async_trait]
pub trait ProductSource: Send + Sync {
    async fn products(&self) -> Result<Vec<String>, ProducerError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductList {
    Plain(Vec<String>),
    Wrapped { items: Vec<String> },
}

impl ProductList {
    fn into_names(self) -> Vec<String> {
        let raw = match self {
            ProductList::Plain(items) | ProductList::Wrapped { items } => items,
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Reads the product list from a JSON endpoint returning either an array of
/// names or `{"items": [...]}`.
pub struct HttpProductSource {
    client: JsonClient,
    url: String,
}

impl HttpProductSource {
    pub fn new(client: JsonClient, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait::async_trait]
impl ProductSource for HttpProductSource {
    async fn products(&self) -> Result<Vec<String>, ProducerError> {
        let list: ProductList = self.client.get_json(&self.url, &[("accept", "application/json")]).await?;
        let names = list.into_names();
        if names.is_empty() {
            return Err(ProducerError::Source(format!("{} returned no products", self.url)));
        }
        Ok(names)
    }
}

/// Producer chaining a [`ProductSource`] and a [`MealPlanner`].
pub struct DinnersProducer<S, P> {
    products: S,
    planner: P,
    clock: Arc<dyn Clock>,
}

impl<S: ProductSource, P: MealPlanner> DinnersProducer<S, P> {
    pub fn new(products: S, planner: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            products,
            planner,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl<S: ProductSource, P: MealPlanner> Producer for DinnersProducer<S, P> {
    type Output = WeeklyPlan;

    async fn produce(&self) -> Result<WeeklyPlan, ProducerError> {
        let vegetables = self.products.products().await?;
        info!(component = "dinners", products = vegetables.len(), "planning dinners");
        let meals = self.planner.plan(&vegetables).await?;

        Ok(WeeklyPlan {
            week_of: self.clock.now().date(),
            vegetables,
            meals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Meal, MEAL_DAYS};
    use crate::time::ManualClock;
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::time::Duration;

    struct Fixed(Vec<String>);

    #[async_trait::async_trait]
    impl ProductSource for Fixed {
        async fn products(&self) -> Result<Vec<String>, ProducerError> {
            Ok(self.0.clone())
        }
    }

    struct EchoPlanner;

    #[async_trait::async_trait]
    impl MealPlanner for EchoPlanner {
        async fn plan(&self, products: &[String]) -> Result<Vec<Meal>, ProducerError> {
            Ok(MEAL_DAYS
                .iter()
                .zip(products.iter().cycle())
                .map(|(day, product)| Meal {
                    day: day.to_string(),
                    name: format!("Plat {product}"),
                    description: String::new(),
                    uses: vec![product.clone()],
                })
                .collect())
        }
    }

    struct FailingPlanner;

    #[async_trait::async_trait]
    impl MealPlanner for FailingPlanner {
        async fn plan(&self, _products: &[String]) -> Result<Vec<Meal>, ProducerError> {
            Err(ProducerError::Plan("expected 4 meals, got 3".to_string()))
        }
    }

    fn clock() -> Arc<dyn Clock> {
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        Arc::new(ManualClock::new(saturday.and_hms_opt(9, 30, 0).unwrap()))
    }

    #[tokio::test]
    async fn test_produce_builds_weekly_plan() {
        let products = Fixed(vec!["Poireaux".to_string(), "Carottes".to_string()]);
        let producer = DinnersProducer::new(products, EchoPlanner, clock());

        let plan = producer.produce().await.unwrap();
        assert_eq!(plan.week_of, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(plan.vegetables, vec!["Poireaux", "Carottes"]);
        assert_eq!(plan.meals.len(), 4);
        assert_eq!(plan.meals[2].uses, vec!["Poireaux"]);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["week_of"], "2024-03-09");
    }

    #[tokio::test]
    async fn test_planner_failure_fails_attempt() {
        let producer = DinnersProducer::new(Fixed(vec!["Chou".to_string()]), FailingPlanner, clock());
        let err = producer.produce().await.unwrap_err();
        assert!(err.to_string().contains("expected 4 meals"));
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_product_source_shapes() {
        let router = Router::new()
            .route("/plain", get(|| async { Json(json!([" Poireaux ", "", "Carottes"])) }))
            .route("/wrapped", get(|| async { Json(json!({"items": ["Chou"]})) }))
            .route("/empty", get(|| async { Json(json!({"items": ["  "]})) }));
        let base = serve(router).await;
        let client = JsonClient::new(crate::http::client::create_client(), Duration::from_secs(5));

        let plain = HttpProductSource::new(client.clone(), format!("{base}/plain"));
        assert_eq!(plain.products().await.unwrap(), vec!["Poireaux", "Carottes"]);

        let wrapped = HttpProductSource::new(client.clone(), format!("{base}/wrapped"));
        assert_eq!(wrapped.products().await.unwrap(), vec!["Chou"]);

        let empty = HttpProductSource::new(client, format!("{base}/empty"));
        assert!(matches!(empty.products().await, Err(ProducerError::Source(_))));
    }
}
