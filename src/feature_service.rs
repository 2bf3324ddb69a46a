// Copyright 2018 The GeoRust Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Blocking client for a REST feature service (`addFeatures`, `updateFeatures`,
//! `query`). Every request carries `f=json` and the access token as query
//! parameters.

use std::time::Duration;

use geojson::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

use crate::{Error, Feature, Properties};

/// A feature as exchanged with the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceFeature {
    #[serde(default)]
    pub attributes: Properties,
    #[serde(default)]
    pub geometry: JsonObject,
}

impl<'a> From<&'a Feature> for ServiceFeature {
    /// Polygon rings go under `geometry.rings`.
    fn from(feature: &'a Feature) -> ServiceFeature {
        let mut geometry = JsonObject::new();
        geometry.insert(
            "rings".to_owned(),
            JsonValue::from(feature.geometry.rings().to_vec()),
        );
        ServiceFeature {
            attributes: feature.properties.clone(),
            geometry,
        }
    }
}

/// Outcome of an add or update request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
struct EditPayload<'a> {
    features: &'a [ServiceFeature],
}

#[derive(Deserialize)]
struct QueryResult {
    #[serde(default)]
    features: Vec<ServiceFeature>,
}

pub struct FeatureServiceClient {
    base_url: String,
    token: String,
    agent: ureq::Agent,
}

impl FeatureServiceClient {
    pub fn new<B: Into<String>, T: Into<String>>(base_url: B, token: T) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        FeatureServiceClient::with_agent(base_url, token, agent)
    }

    pub fn with_agent<B: Into<String>, T: Into<String>>(base_url: B, token: T, agent: ureq::Agent) -> Self {
        FeatureServiceClient {
            base_url: base_url.into(),
            token: token.into(),
            agent,
        }
    }

    fn endpoint(&self, service: &str, operation: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            service.trim_matches('/'),
            operation
        )
    }

    fn common_params(&self) -> [(&'static str, &str); 2] {
        [("f", "json"), ("token", self.token.as_str())]
    }

    fn edit(&self, service: &str, operation: &str, feature: &ServiceFeature) -> Result<FeatureResponse, Error> {
        let url = self.endpoint(service, operation);
        log::debug!("POST {}", url);
        let body = serde_json::to_string(&EditPayload {
            features: std::slice::from_ref(feature),
        })?;
        let mut request = self.agent.post(&url).set("Content-Type", "application/json");
        for (param, value) in self.common_params().iter() {
            request = request.query(param, value);
        }
        let text = send(request.send_string(&body))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn add_feature(&self, service: &str, feature: &ServiceFeature) -> Result<FeatureResponse, Error> {
        self.edit(service, "addFeatures", feature)
    }

    pub fn update_feature(&self, service: &str, feature: &ServiceFeature) -> Result<FeatureResponse, Error> {
        self.edit(service, "updateFeatures", feature)
    }

    /// Features of `service` matching the `where` filter expression, with all fields.
    pub fn query_features(&self, service: &str, filter: &str) -> Result<Vec<ServiceFeature>, Error> {
        let url = self.endpoint(service, "query");
        log::debug!("GET {} where {}", url, filter);
        let mut request = self
            .agent
            .get(&url)
            .query("where", filter)
            .query("outFields", "*");
        for (param, value) in self.common_params().iter() {
            request = request.query(param, value);
        }
        let text = send(request.call())?;
        let result: QueryResult = serde_json::from_str(&text)?;
        log::debug!("query returned {} features", result.features.len());
        Ok(result.features)
    }
}

fn send(result: Result<ureq::Response, ureq::Error>) -> Result<String, Error> {
    match result {
        Ok(response) => Ok(response.into_string()?),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            log::warn!("feature service answered {}", status);
            Err(Error::FeatureService { status, body })
        }
        Err(e) => Err(Error::Transport(e.to_string())),
    }
}
