use crate::core::AddressService;
use crate::domain::model::{Address, AddressLookup, NormalizedPostalCode};
use crate::utils::error::{GeocodeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_VIACEP_ENDPOINT: &str = "https://viacep.com.br/ws";

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    /// `true` (or `"true"` on newer deployments) for unknown codes.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// ViaCEP client: `GET {endpoint}/{cep}/json/`.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    endpoint: String,
}

impl ViaCepClient {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, postal_code: &NormalizedPostalCode) -> String {
        format!("{}/{}/json/", self.endpoint, postal_code.digits())
    }
}

#[async_trait]
impl AddressService for ViaCepClient {
    async fn lookup(&self, postal_code: &NormalizedPostalCode) -> Result<AddressLookup> {
        let url = self.url_for(postal_code);
        tracing::debug!("Making ViaCEP request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("ViaCEP response status: {}", response.status());

        if !response.status().is_success() {
            return Err(GeocodeError::UpstreamStatusError {
                service: "ViaCEP".to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: ViaCepResponse = response.json().await?;
        if body.is_not_found() {
            return Ok(AddressLookup::NotFound);
        }

        Ok(AddressLookup::Found(Address {
            street: body.logradouro,
            city: body.localidade,
            region: body.uf,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::parse;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> ViaCepClient {
        ViaCepClient::new(&server.url("/ws"), "cep-geocoder-test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_found() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/01310100/json/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "cep": "01310-100",
                    "logradouro": "Avenida Paulista",
                    "complemento": "de 612 a 1510 - lado par",
                    "bairro": "Bela Vista",
                    "localidade": "São Paulo",
                    "uf": "SP"
                }));
        });

        let client = client_for(&server);
        let result = client.lookup(&parse("01310-100").unwrap()).await.unwrap();

        api_mock.assert();
        assert_eq!(
            result,
            AddressLookup::Found(Address {
                street: "Avenida Paulista".to_string(),
                city: "São Paulo".to_string(),
                region: "SP".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_lookup_not_found_flag() {
        let server = MockServer::start();
        let bool_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/99999999/json/");
            then.status(200).json_body(serde_json::json!({"erro": true}));
        });
        let string_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/99999998/json/");
            then.status(200).json_body(serde_json::json!({"erro": "true"}));
        });

        let client = client_for(&server);

        let first = client.lookup(&parse("99999999").unwrap()).await.unwrap();
        let second = client.lookup(&parse("99999998").unwrap()).await.unwrap();

        bool_mock.assert();
        string_mock.assert();
        assert_eq!(first, AddressLookup::NotFound);
        assert_eq!(second, AddressLookup::NotFound);
    }

    #[tokio::test]
    async fn test_city_level_code_has_blank_street() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ws/13010000/json/");
            then.status(200).json_body(serde_json::json!({
                "cep": "13010-000",
                "localidade": "Campinas",
                "uf": "SP"
            }));
        });

        let client = client_for(&server);
        let result = client.lookup(&parse("13010000").unwrap()).await.unwrap();

        match result {
            AddressLookup::Found(address) => {
                assert_eq!(address.street, "");
                assert_eq!(address.city, "Campinas");
            }
            other => panic!("unexpected lookup result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/ws/13010000/json/");
            then.status(500);
        });

        let client = client_for(&server);
        let result = client.lookup(&parse("13010-000").unwrap()).await;

        api_mock.assert();
        assert!(matches!(
            result,
            Err(GeocodeError::UpstreamStatusError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ws/01310100/json/");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = client_for(&server);
        let result = client.lookup(&parse("01310100").unwrap()).await;

        assert!(matches!(result, Err(GeocodeError::HttpError(_))));
    }

    #[test]
    fn test_trailing_slash_in_endpoint() {
        let client =
            ViaCepClient::new("https://viacep.com.br/ws/", "ua", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.url_for(&parse("01310100").unwrap()),
            "https://viacep.com.br/ws/01310100/json/"
        );
    }
}
