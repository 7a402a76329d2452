//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the store be reached? Failure → pulled from the load balancer. |

use tracing::warn;

use crate::store::SharedStore;
use crate::{Request, Response, Status};

/// Liveness probe handler.
///
/// Always returns `200 OK` with body `"ok"`. If the process can answer HTTP
/// at all, it is alive; this handler has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe handler: `200 ready` when the store answers a ping,
/// `503 not ready` otherwise.
pub async fn readiness(store: SharedStore, _req: Request) -> Response {
    match store.ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!("readiness check failed: {e}");
            Response::builder()
                .status(Status::ServiceUnavailable)
                .text("not ready")
        }
    }
}
