pub mod file_store;
pub mod http;
pub mod manga_http;
pub mod reflect_http;
pub mod stub;

pub use file_store::FileStore;
pub use http::build_client;
pub use manga_http::HttpMangaAdapter;
pub use reflect_http::HttpReflectionAdapter;
pub use stub::{StubMangaAdapter, StubReflectionAdapter};
