use tracing::{
  debug,
  info,
  warn
};

use crate::dates::DateSource;
use crate::error::ClientError;
use crate::task::{
  NewTask,
  RemoteTask,
  Task
};

pub const DEFAULT_ENDPOINT: &str =
  "https://jsonplaceholder.typicode.com/todos";

/// Remote task collection. One attempt per call, no retries.
#[allow(async_fn_in_trait)]
pub trait TaskApi {
  async fn fetch_all(
    &self
  ) -> Result<Vec<Task>, ClientError>;

  async fn append(
    &self,
    title: &str
  ) -> Result<Task, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpTaskApi<D> {
  http:     reqwest::Client,
  endpoint: String,
  dates:    D
}

impl<D: DateSource> HttpTaskApi<D> {
  pub fn new(
    endpoint: impl Into<String>,
    dates: D
  ) -> Self {
    Self::with_client(
      reqwest::Client::new(),
      endpoint,
      dates
    )
  }

  pub fn with_client(
    http: reqwest::Client,
    endpoint: impl Into<String>,
    dates: D
  ) -> Self {
    Self {
      http,
      endpoint: endpoint.into(),
      dates
    }
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

impl<D: DateSource> TaskApi
  for HttpTaskApi<D>
{
  #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
  async fn fetch_all(
    &self
  ) -> Result<Vec<Task>, ClientError> {
    let response = self
      .http
      .get(&self.endpoint)
      .send()
      .await
      .map_err(|err| {
        warn!(error = %err, "fetch request failed");
        ClientError::fetch_transport(err)
      })?;

    let status = response.status();
    if !status.is_success() {
      warn!(
        status = status.as_u16(),
        "fetch returned non-success \
         status"
      );
      return Err(
        ClientError::fetch_status(
          status.as_u16()
        )
      );
    }

    let records: Vec<RemoteTask> =
      response.json().await.map_err(
        |err| {
          warn!(error = %err, "fetch body could not be decoded");
          ClientError::fetch_transport(
            err
          )
        }
      )?;

    info!(
      count = records.len(),
      "fetched tasks"
    );

    Ok(
      records
        .into_iter()
        .map(|remote| {
          let date =
            self.dates.synthesize();
          Task::from_remote(remote, date)
        })
        .collect()
    )
  }

  #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
  async fn append(
    &self,
    title: &str
  ) -> Result<Task, ClientError> {
    let body = NewTask::pending(title);
    let response = self
      .http
      .post(&self.endpoint)
      .json(&body)
      .send()
      .await
      .map_err(|err| {
        warn!(error = %err, "append request failed");
        ClientError::append_transport(
          err
        )
      })?;

    let status = response.status();
    if !status.is_success() {
      warn!(
        status = status.as_u16(),
        "append returned non-success \
         status"
      );
      return Err(
        ClientError::append_status(
          status.as_u16()
        )
      );
    }

    let remote: RemoteTask =
      response.json().await.map_err(
        |err| {
          warn!(error = %err, "append body could not be decoded");
          ClientError::append_transport(
            err
          )
        }
      )?;

    debug!(
      id = remote.id,
      "server accepted task"
    );
    Ok(Task::from_remote(
      remote,
      self.dates.today()
    ))
  }
}
