//! benchsweep-core: seek-and-destroy cleanup of benchmark-created cloud
//! resources
//!
//! After a benchmark run, every resource the run created has to go —
//! across many backend services that fail independently, without ever
//! touching resources the run does not own, and within a bounded amount
//! of time. This crate is that garbage collector:
//!
//! - [`registry::Registry`] holds one [`kind::KindDescriptor`] per
//!   deletable resource category, with an explicit cross-kind execution
//!   order (dependents before parents).
//! - [`pipeline::CleanupEngine`] runs one bounded producer/consumer
//!   pipeline per kind: discovery lists every credential scope, the
//!   ownership filter drops everything the run did not create, and a
//!   worker pool deletes the rest, confirming disappearance per resource.
//! - Failures are contained per resource and per scope: one broken
//!   backend, stuck deletion, or flaky listing never aborts the job.
//!
//! Vendor adapters plug in through the small capability surface in
//! [`clients`]; per-kind specializations implement [`ops::ResourceOps`].

pub mod clients;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod filter;
pub mod handle;
pub mod job;
pub mod kind;
pub mod kinds;
pub mod naming;
pub mod ops;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod resource;

pub use clients::{CachingProviderFactory, ClientProvider, Credential, ProviderFactory, ServiceClient};
pub use driver::DeleteOutcome;
pub use error::{BackendError, RegistryError};
pub use handle::{ResourceHandle, ResourceScope};
pub use job::CleanupJob;
pub use kind::KindDescriptor;
pub use naming::{GeneratedNameMatcher, NameMatcher};
pub use ops::{CollectionOps, ResourceOps, SynchronousOps};
pub use pipeline::CleanupEngine;
pub use registry::{RegisteredKind, Registry};
pub use report::{CleanupReport, KindReport};
pub use resource::RawResource;
