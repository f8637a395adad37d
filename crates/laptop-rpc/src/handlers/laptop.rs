// crates/laptop-rpc/src/handlers/laptop.rs
//
// Catalog handlers: CreateLaptop, SearchLaptop, UploadImage, RateLaptop.
// These handlers interact with laptop-store through the laptop-core traits.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::Stream;
use tonic::Status;
use uuid::Uuid;

use laptop_core::traits::{ImageStore, LaptopStore, RatingStore};
use laptop_core::{CallContext, Filter, Laptop, LaptopError};

use crate::handlers::{next_message, send_message};
use crate::proto::{
    upload_image_request, CreateLaptopRequest, CreateLaptopResponse, RateLaptopRequest,
    RateLaptopResponse, SearchLaptopResponse, UploadImageRequest, UploadImageResponse,
};
use crate::status::{log_status, status_from_error};

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_SIZE: usize = 1 << 20;

/// The stores the catalog handlers work against.
#[derive(Clone)]
pub struct LaptopStores {
    pub laptops: Arc<dyn LaptopStore>,
    pub images: Arc<dyn ImageStore>,
    pub ratings: Arc<dyn RatingStore>,
}

impl std::fmt::Debug for LaptopStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaptopStores").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// CreateLaptop
// ---------------------------------------------------------------------------

/// Handle a CreateLaptop request.
///
/// A client-supplied ID must be a valid UUID; an empty one is replaced with
/// a fresh UUID v4.
pub fn handle_create_laptop(
    laptops: &dyn LaptopStore,
    ctx: &CallContext,
    request: CreateLaptopRequest,
) -> Result<CreateLaptopResponse, Status> {
    let mut laptop: Laptop = request
        .laptop
        .ok_or_else(|| log_status(Status::invalid_argument("laptop is required")))?
        .into();
    tracing::info!(laptop_id = %laptop.id, "Received a create-laptop request");

    if laptop.id.is_empty() {
        laptop.id = Uuid::new_v4().to_string();
    } else {
        Uuid::parse_str(&laptop.id).map_err(|e| {
            log_status(Status::invalid_argument(format!(
                "laptop ID is not a valid UUID: {}",
                e
            )))
        })?;
    }

    ctx.check()
        .map_err(|e| status_from_error("cannot save laptop", &e))?;

    laptops
        .save(&laptop)
        .map_err(|e| status_from_error("cannot save laptop to the store", &e))?;

    tracing::info!(laptop_id = %laptop.id, "Saved laptop");
    Ok(CreateLaptopResponse { id: laptop.id })
}

// ---------------------------------------------------------------------------
// SearchLaptop
// ---------------------------------------------------------------------------

/// Handle a SearchLaptop request, streaming each match into `tx`.
///
/// The scan runs on a blocking thread and pushes with `blocking_send`, so a
/// slow client stalls the scan instead of growing a buffer. If the receiving
/// side goes away the context is cancelled and the scan stops at the next
/// laptop. Returns the number of laptops sent.
pub async fn handle_search_laptop(
    laptops: Arc<dyn LaptopStore>,
    ctx: CallContext,
    filter: Filter,
    tx: mpsc::Sender<Result<SearchLaptopResponse, Status>>,
) -> Result<usize, Status> {
    tracing::info!(?filter, "Received a search-laptop request");

    let watcher = {
        let tx = tx.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            tx.closed().await;
            ctx.cancel();
        })
    };

    let scan_ctx = ctx.clone();
    let scan = tokio::task::spawn_blocking(move || {
        let mut sent = 0usize;
        let result = laptops.search(&scan_ctx, &filter, &mut |laptop| {
            tracing::info!(laptop_id = %laptop.id, "Found laptop");
            let response = SearchLaptopResponse {
                laptop: Some(laptop.into()),
            };
            if tx.blocking_send(Ok(response)).is_err() {
                scan_ctx.cancel();
                return Err(LaptopError::Cancelled);
            }
            sent += 1;
            Ok(())
        });
        result.map(|()| sent)
    })
    .await;
    watcher.abort();

    match scan {
        Ok(Ok(sent)) => {
            tracing::info!(sent, "Search finished");
            Ok(sent)
        }
        Ok(Err(e)) => Err(status_from_error("cannot search laptop", &e)),
        Err(e) => Err(log_status(Status::internal(format!(
            "search task failed: {}",
            e
        )))),
    }
}

// ---------------------------------------------------------------------------
// UploadImage
// ---------------------------------------------------------------------------

/// Handle an UploadImage stream: one `Info` message, then chunks until the
/// client half-closes.
///
/// Nothing is written unless the whole image arrived within
/// `MAX_IMAGE_SIZE` bytes.
pub async fn handle_upload_image<S>(
    laptops: &dyn LaptopStore,
    images: &dyn ImageStore,
    ctx: &CallContext,
    mut stream: S,
) -> Result<UploadImageResponse, Status>
where
    S: Stream<Item = Result<UploadImageRequest, Status>> + Unpin,
{
    let first = next_message(ctx, &mut stream)
        .await
        .map_err(|e| status_from_error("cannot receive image info", &e))?;

    let info = match first {
        Some(Ok(UploadImageRequest {
            data: Some(upload_image_request::Data::Info(info)),
        })) => info,
        Some(Ok(_)) => {
            return Err(log_status(Status::unknown(
                "cannot receive image info: first message must carry image info",
            )))
        }
        Some(Err(e)) => {
            return Err(log_status(Status::unknown(format!(
                "cannot receive image info: {}",
                e.message()
            ))))
        }
        None => {
            return Err(log_status(Status::unknown(
                "cannot receive image info: stream closed",
            )))
        }
    };
    tracing::info!(
        laptop_id = %info.laptop_id,
        image_type = %info.image_type,
        "Received an upload-image request"
    );

    let laptop = laptops
        .find(&info.laptop_id)
        .map_err(|e| status_from_error("cannot find laptop", &e))?;
    if laptop.is_none() {
        return Err(log_status(Status::invalid_argument(format!(
            "laptop {} doesn't exist",
            info.laptop_id
        ))));
    }

    let mut image_data = Vec::new();
    loop {
        let message = next_message(ctx, &mut stream)
            .await
            .map_err(|e| status_from_error("cannot receive chunk data", &e))?;

        let chunk = match message {
            None => {
                tracing::info!("No more data");
                break;
            }
            Some(Err(e)) => {
                return Err(log_status(Status::unknown(format!(
                    "cannot receive chunk data: {}",
                    e.message()
                ))))
            }
            Some(Ok(UploadImageRequest {
                data: Some(upload_image_request::Data::ChunkData(chunk)),
            })) => chunk,
            Some(Ok(UploadImageRequest {
                data: Some(upload_image_request::Data::Info(_)),
            })) => {
                return Err(log_status(Status::invalid_argument(
                    "image info can only be sent once",
                )))
            }
            Some(Ok(UploadImageRequest { data: None })) => Vec::new(),
        };

        let size = image_data.len() + chunk.len();
        tracing::debug!(chunk = chunk.len(), total = size, "Received a chunk");
        if size > MAX_IMAGE_SIZE {
            return Err(log_status(Status::invalid_argument(format!(
                "image is too large: {} > {}",
                size, MAX_IMAGE_SIZE
            ))));
        }
        image_data.extend_from_slice(&chunk);
    }

    let size = image_data.len();
    let image_id = images
        .save(&info.laptop_id, &info.image_type, image_data)
        .await
        .map_err(|e| status_from_error("cannot save image to the store", &e))?;

    tracing::info!(image_id = %image_id, size, "Saved image");
    Ok(UploadImageResponse {
        id: image_id,
        size: size as u32,
    })
}

// ---------------------------------------------------------------------------
// RateLaptop
// ---------------------------------------------------------------------------

/// Handle a RateLaptop stream: one response per request, in order, until the
/// client half-closes. Returns the number of ratings recorded.
pub async fn handle_rate_laptop<S>(
    laptops: &dyn LaptopStore,
    ratings: &dyn RatingStore,
    ctx: &CallContext,
    mut stream: S,
    tx: &mpsc::Sender<Result<RateLaptopResponse, Status>>,
) -> Result<u32, Status>
where
    S: Stream<Item = Result<RateLaptopRequest, Status>> + Unpin,
{
    let mut rated = 0;
    loop {
        let message = next_message(ctx, &mut stream)
            .await
            .map_err(|e| status_from_error("cannot receive stream request", &e))?;

        let request = match message {
            None => {
                tracing::info!(rated, "No more data");
                return Ok(rated);
            }
            Some(Err(e)) => {
                return Err(log_status(Status::unknown(format!(
                    "cannot receive stream request: {}",
                    e.message()
                ))))
            }
            Some(Ok(request)) => request,
        };
        tracing::info!(
            laptop_id = %request.laptop_id,
            score = request.score,
            "Received a rate-laptop request"
        );

        let found = laptops
            .find(&request.laptop_id)
            .map_err(|e| status_from_error("cannot find laptop", &e))?;
        if found.is_none() {
            return Err(log_status(Status::not_found(format!(
                "laptop ID {} is not found",
                request.laptop_id
            ))));
        }

        let rating = ratings
            .add(&request.laptop_id, request.score)
            .map_err(|e| status_from_error("cannot add rating to the store", &e))?;

        let response = RateLaptopResponse {
            laptop_id: request.laptop_id,
            rated_count: rating.count,
            average_score: rating.average(),
        };
        let sent = send_message(ctx, tx, response)
            .await
            .map_err(|e| status_from_error("cannot send stream response", &e))?;
        if !sent {
            return Err(log_status(Status::unknown(
                "cannot send stream response: receiver dropped",
            )));
        }
        rated += 1;
    }
}
