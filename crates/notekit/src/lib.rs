pub mod error;
pub mod fetch;
pub mod index;
pub mod stubs;

pub use error::NotekitError;
pub use fetch::{ContentFetcher, DEFAULT_TIMEOUT, HttpFetcher, parse_url};
pub use index::{
    IndexConfig, IndexEntry, IndexReport, build_index, collect_entries, render_entry,
    write_index,
};
pub use stubs::{
    FailurePolicy, SectionLink, SkippedLink, StubConfig, StubFile, StubReport, extract_links,
    generate_stubs, generate_stubs_from_html, plan_stub, render_stub, section_prefix,
    sequence_prefix, stub_file_name, stub_title,
};
