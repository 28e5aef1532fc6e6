use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::models::{
    AddTaskRequest, ChatRequest, ChatResponse, ClearResponse, FillInfo, RemoveResponse, StateInfo,
    TaskInfo,
};

pub struct HTTPClient {
    pub base_url: String,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|err| err.to_string())?;
        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, String> {
        let resp = builder.send().map_err(|err| err.to_string())?;
        decode(resp)
    }

    pub fn chat(&self, message: &str) -> Result<ChatResponse, String> {
        let req = ChatRequest {
            message: message.to_string(),
        };
        self.send(self.client.post(self.url("/chat")).json(&req))
    }

    pub fn state(&self) -> Result<StateInfo, String> {
        self.send(self.client.get(self.url("/state")))
    }

    pub fn add_task(&self, description: &str) -> Result<TaskInfo, String> {
        let req = AddTaskRequest {
            description: description.to_string(),
        };
        self.send(self.client.post(self.url("/backlog")).json(&req))
    }

    pub fn remove_task(&self, id: &str) -> Result<RemoveResponse, String> {
        self.send(self.client.delete(self.url(&format!("/backlog/{}", id))))
    }

    pub fn fill(&self) -> Result<FillInfo, String> {
        self.send(self.client.post(self.url("/fill")))
    }

    pub fn clear(&self) -> Result<ClearResponse, String> {
        self.send(self.client.post(self.url("/clear")))
    }
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, String> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>().map_err(|err| err.to_string())
    } else {
        let body = resp.text().unwrap_or_default();
        Err(format!("http {}: {}", status.as_u16(), body))
    }
}
