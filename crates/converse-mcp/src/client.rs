//! A client speaking the same protocol, over a byte stream or over HTTP.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;

use crate::transport::framing;
use crate::types::*;

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct StreamChannel {
    lines: Lines<BufReader<BoxedReader>>,
    writer: BoxedWriter,
}

impl StreamChannel {
    async fn send(&mut self, message: &impl Serialize) -> McpResult<()> {
        let frame = framing::frame_message(&serde_json::to_value(message)?)?;
        self.writer.write_all(frame.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read until the reply carrying `id` shows up.
    async fn receive(&mut self, id: &RequestId) -> McpResult<Value> {
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let value = framing::parse_message(&line)?;
            if RequestId::from_payload(&value) == *id && value.get("method").is_none() {
                return Ok(value);
            }
            tracing::debug!("Skipping unrelated message while waiting for reply {id}");
        }
        Err(McpError::Transport("connection closed before reply".to_string()))
    }
}

enum Channel {
    Stream(Mutex<StreamChannel>),
    #[cfg(feature = "http")]
    Http {
        http: reqwest::Client,
        url: reqwest::Url,
    },
}

/// Sends requests to an MCP server and decodes the replies.
///
/// Request ids are sequential numbers starting at 1.
pub struct Client {
    channel: Channel,
    next_id: AtomicI64,
}

impl Client {
    /// Talk line-delimited JSON over any duplex byte stream.
    pub fn from_stream<S>(io: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(io);
        let reader: BoxedReader = Box::new(reader);
        Self::with_channel(Channel::Stream(Mutex::new(StreamChannel {
            lines: BufReader::new(reader).lines(),
            writer: Box::new(writer),
        })))
    }

    /// Talk to an HTTP bridge, e.g. `http://127.0.0.1:8080/mcp`.
    #[cfg(feature = "http")]
    pub fn from_url(url: &str) -> McpResult<Self> {
        Self::from_url_with(url, reqwest::Client::new())
    }

    /// Like [`Client::from_url`], with a preconfigured HTTP client (proxy, timeouts, TLS).
    #[cfg(feature = "http")]
    pub fn from_url_with(url: &str, http: reqwest::Client) -> McpResult<Self> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| McpError::Transport(format!("invalid url '{url}': {e}")))?;
        Ok(Self::with_channel(Channel::Http { http, url }))
    }

    fn with_channel(channel: Channel) -> Self {
        Self {
            channel,
            next_id: AtomicI64::new(1),
        }
    }

    /// Send a request and wait for its result. An error reply becomes [`McpError::Remote`].
    pub async fn call(&self, method: &str, params: Option<Value>) -> McpResult<Value> {
        let id = RequestId::from(self.next_id.fetch_add(1, Ordering::SeqCst));
        let request = JsonRpcRequest::new(id.clone(), method, params);

        let reply = match &self.channel {
            Channel::Stream(channel) => {
                let mut channel = channel.lock().await;
                channel.send(&request).await?;
                channel.receive(&id).await?
            }
            #[cfg(feature = "http")]
            Channel::Http { http, url } => http
                .post(url.clone())
                .json(&request)
                .send()
                .await
                .map_err(transport_error)?
                .json::<Value>()
                .await
                .map_err(transport_error)?,
        };

        match serde_json::from_value::<JsonRpcMessage>(reply)? {
            JsonRpcMessage::Response(response) => Ok(response.result),
            JsonRpcMessage::Error(error) => Err(McpError::from_error_object(error.error)),
            _ => Err(McpError::Transport(format!(
                "unexpected reply to '{method}'"
            ))),
        }
    }

    /// Send a notification. No reply is expected.
    pub async fn notify(&self, method: &str, params: Option<Value>) -> McpResult<()> {
        let notification = JsonRpcNotification::new(method, params);
        match &self.channel {
            Channel::Stream(channel) => channel.lock().await.send(&notification).await,
            #[cfg(feature = "http")]
            Channel::Http { http, url } => {
                let response = http
                    .post(url.clone())
                    .json(&notification)
                    .send()
                    .await
                    .map_err(transport_error)?;
                if !response.status().is_success() {
                    return Err(McpError::Transport(format!(
                        "notification '{method}' rejected with status {}",
                        response.status()
                    )));
                }
                Ok(())
            }
        }
    }

    async fn request<P, R>(&self, method: Method, params: Option<&P>) -> McpResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let params = params.map(serde_json::to_value).transpose()?;
        let result = self.call(method.as_str(), params).await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn initialize(&self) -> McpResult<InitializeResult> {
        self.request::<Value, _>(Method::Initialize, None).await
    }

    pub async fn list_prompts(&self) -> McpResult<Vec<Prompt>> {
        let result: PromptListResult = self.request::<Value, _>(Method::PromptsList, None).await?;
        Ok(result.prompts)
    }

    pub async fn get_prompt(&self, params: &GetPromptParams) -> McpResult<GetPromptResult> {
        self.request(Method::PromptsGet, Some(params)).await
    }

    pub async fn list_resources(&self) -> McpResult<Vec<Resource>> {
        let result: ResourceListResult =
            self.request::<Value, _>(Method::ResourcesList, None).await?;
        Ok(result.resources)
    }

    pub async fn read_resource(&self, uri: &str) -> McpResult<ReadResourceResult> {
        self.request(Method::ResourcesRead, Some(&ReadResourceParams::new(uri)))
            .await
    }

    pub async fn list_tools(&self) -> McpResult<Vec<Tool>> {
        let result: ToolListResult = self.request::<Value, _>(Method::ToolsList, None).await?;
        Ok(result.tools)
    }

    pub async fn call_tool(&self, params: &CallToolParams) -> McpResult<CallToolResult> {
        self.request(Method::ToolsCall, Some(params)).await
    }
}

#[cfg(feature = "http")]
fn transport_error(e: reqwest::Error) -> McpError {
    McpError::Transport(e.to_string())
}
