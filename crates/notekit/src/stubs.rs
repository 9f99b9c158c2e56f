//! Stub generation for course section pages.
//!
//! A course table of contents is fetched once, every anchor carrying the
//! section class marker is turned into a [`StubFile`], and each stub is
//! written as a one-line Markdown note: `# [title](url)`.

use std::fs;
use std::path::{Path, PathBuf};

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::error::NotekitError;
use crate::fetch::{ContentFetcher, parse_url};

pub const DEFAULT_BASE_URL: &str = "https://fullstackopen.com/en/part5";
pub const DEFAULT_SITE_ROOT: &str = "https://fullstackopen.com";
pub const DEFAULT_ANCHOR_CLASS: &str = "arrow__wrapper--stacked";

/// What to do when a single link cannot be turned into a stub.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing link. Stubs already written are kept.
    #[default]
    Abort,
    /// Log the failure, record it in the report, and move on.
    Continue,
}

#[derive(Clone, Debug)]
pub struct StubConfig {
    pub base_url: String,
    pub site_root: String,
    pub anchor_class: String,
    pub output_dir: PathBuf,
    pub failure_policy: FailurePolicy,
    pub dry_run: bool,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site_root: DEFAULT_SITE_ROOT.to_string(),
            anchor_class: DEFAULT_ANCHOR_CLASS.to_string(),
            output_dir: PathBuf::from("."),
            failure_policy: FailurePolicy::default(),
            dry_run: false,
        }
    }
}

/// An anchor pulled from the table of contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionLink {
    pub href: String,
    pub label: String,
}

/// A stub note derived from one link and its position on the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StubFile {
    pub file_name: String,
    pub title: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SkippedLink {
    pub index: usize,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct StubReport {
    pub source: String,
    pub output_dir: String,
    pub stubs: Vec<StubFile>,
    pub skipped: Vec<SkippedLink>,
    pub dry_run: bool,
}

/// Fetches `config.base_url` and writes one stub per matched anchor.
pub fn generate_stubs<F>(fetcher: &F, config: &StubConfig) -> Result<StubReport, NotekitError>
where
    F: ContentFetcher + ?Sized,
{
    let base = parse_url(&config.base_url)?;
    parse_url(&config.site_root)?;

    let html = fetcher
        .fetch(&base)
        .map_err(|err| err.context(format!("loading {}", config.base_url)))?;
    tracing::info!(url = %base, bytes = html.len(), "fetched table of contents");

    let mut report = generate_stubs_from_html(&html, config)?;
    report.source = base.to_string();
    Ok(report)
}

/// Runs the stub pipeline over HTML already in hand.
pub fn generate_stubs_from_html(
    html: &str,
    config: &StubConfig,
) -> Result<StubReport, NotekitError> {
    let prefix = section_prefix(&config.base_url, &config.site_root);
    let anchors = scan_anchors(html, &config.anchor_class)?;
    tracing::info!(
        count = anchors.len(),
        class = %config.anchor_class,
        "matched section anchors"
    );

    let mut report = StubReport {
        source: config.base_url.clone(),
        output_dir: config.output_dir.display().to_string(),
        dry_run: config.dry_run,
        ..StubReport::default()
    };

    if !config.dry_run && !anchors.is_empty() {
        fs::create_dir_all(&config.output_dir)?;
    }

    for (index, anchor) in anchors.into_iter().enumerate() {
        let outcome = anchor.and_then(|link| {
            let stub = plan_stub(index, &link, &prefix, &config.site_root);
            if !config.dry_run {
                write_stub(&config.output_dir, &stub)?;
            }
            Ok(stub)
        });

        match outcome {
            Ok(stub) => report.stubs.push(stub),
            Err(err) => match config.failure_policy {
                FailurePolicy::Abort => {
                    return Err(err.context(format!("section link #{}", index + 1)));
                }
                FailurePolicy::Continue => {
                    tracing::warn!(index, error = %err, "skipping section link");
                    report.skipped.push(SkippedLink {
                        index,
                        reason: err.to_string(),
                    });
                }
            },
        }
    }

    Ok(report)
}

/// Returns every section link in document order, failing on the first anchor
/// that lacks an `href` or a nested `<p>` label.
pub fn extract_links(html: &str, anchor_class: &str) -> Result<Vec<SectionLink>, NotekitError> {
    scan_anchors(html, anchor_class)?.into_iter().collect()
}

fn scan_anchors(
    html: &str,
    anchor_class: &str,
) -> Result<Vec<Result<SectionLink, NotekitError>>, NotekitError> {
    let anchor_selector = parse_selector(&format!("a.{anchor_class}"))?;
    let label_selector = parse_selector("p")?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&anchor_selector)
        .map(|anchor| read_anchor(anchor, &label_selector))
        .collect())
}

fn read_anchor(
    anchor: ElementRef<'_>,
    label_selector: &Selector,
) -> Result<SectionLink, NotekitError> {
    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| NotekitError::MissingElement("anchor has no href attribute".into()))?;
    let label = anchor
        .select(label_selector)
        .next()
        .ok_or_else(|| {
            NotekitError::MissingElement(format!("anchor '{href}' has no <p> label"))
        })?
        .text()
        .collect::<String>();

    Ok(SectionLink {
        href: href.to_string(),
        label,
    })
}

fn parse_selector(raw: &str) -> Result<Selector, NotekitError> {
    Selector::parse(raw).map_err(|err| NotekitError::Selector(format!("'{raw}': {err}")))
}

/// Letter prefix for the `index`-th stub: `a`..`z`, then `aa`, `ab`, ...
pub fn sequence_prefix(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// The part of every section href shared with the base page, e.g. `/en/part5/`.
pub fn section_prefix(base_url: &str, site_root: &str) -> String {
    format!("{}/", base_url.replace(site_root, ""))
}

pub fn stub_file_name(index: usize, href: &str, section_prefix: &str) -> String {
    let segment = href.replace(section_prefix, "").replace('_', " ");
    format!("{} {}.md", sequence_prefix(index), segment)
}

/// Drops the two-character section number (`"1."`) from a label. The rest of
/// the label, including its leading space, is kept as is.
pub fn stub_title(label: &str) -> String {
    label.chars().skip(2).collect()
}

pub fn plan_stub(
    index: usize,
    link: &SectionLink,
    section_prefix: &str,
    site_root: &str,
) -> StubFile {
    StubFile {
        file_name: stub_file_name(index, &link.href, section_prefix),
        title: stub_title(&link.label),
        url: format!("{}{}", site_root, link.href),
    }
}

pub fn render_stub(stub: &StubFile) -> String {
    format!("# [{}]({})", stub.title, stub.url)
}

fn write_stub(dir: &Path, stub: &StubFile) -> Result<(), NotekitError> {
    let path = dir.join(&stub.file_name);
    fs::write(&path, render_stub(stub))
        .map_err(|err| NotekitError::from(err).context(format!("writing {}", path.display())))?;
    tracing::debug!(path = %path.display(), "wrote stub");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;
    use url::Url;

    struct StubFetcher {
        responses: HashMap<String, String>,
    }

    impl StubFetcher {
        fn new(entries: &[(&str, &str)]) -> Self {
            let mut responses = HashMap::new();
            for (url, body) in entries {
                responses.insert((*url).to_string(), (*body).to_string());
            }
            Self { responses }
        }
    }

    impl ContentFetcher for StubFetcher {
        fn fetch(&self, url: &Url) -> Result<String, NotekitError> {
            self.responses
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| NotekitError::Fetch(format!("no stub for {}", url)))
        }
    }

    const PART5: &str = r#"
<html><body>
  <nav>
    <a class="arrow__wrapper--stacked" href="/en/part5/intro"><p>1. Intro</p></a>
    <a class="other" href="/en/part5/ignored"><p>x. Ignored</p></a>
    <a class="arrow__wrapper--stacked" href="/en/part5/testing_react_apps"><p>2. Testing</p></a>
  </nav>
</body></html>
"#;

    fn config_in(dir: &Path) -> StubConfig {
        StubConfig {
            output_dir: dir.to_path_buf(),
            ..StubConfig::default()
        }
    }

    #[test]
    fn sequence_prefix_continues_past_z() {
        assert_eq!(sequence_prefix(0), "a");
        assert_eq!(sequence_prefix(25), "z");
        assert_eq!(sequence_prefix(26), "aa");
        assert_eq!(sequence_prefix(27), "ab");
        assert_eq!(sequence_prefix(701), "zz");
        assert_eq!(sequence_prefix(702), "aaa");
    }

    #[test]
    fn section_prefix_strips_site_root() {
        assert_eq!(
            section_prefix(DEFAULT_BASE_URL, DEFAULT_SITE_ROOT),
            "/en/part5/"
        );
    }

    #[test]
    fn file_name_replaces_underscores() {
        let name = stub_file_name(2, "/en/part5/props_children_and_proptypes", "/en/part5/");
        assert_eq!(name, "c props children and proptypes.md");
    }

    #[test]
    fn title_drops_section_number() {
        assert_eq!(stub_title("1. Intro"), " Intro");
        assert_eq!(stub_title("1.Intro"), "Intro");
        assert_eq!(stub_title("é"), "");
    }

    #[test]
    fn extract_links_keeps_document_order_and_class_filter() {
        let links = extract_links(PART5, DEFAULT_ANCHOR_CLASS).unwrap();
        assert_eq!(
            links,
            vec![
                SectionLink {
                    href: "/en/part5/intro".into(),
                    label: "1. Intro".into(),
                },
                SectionLink {
                    href: "/en/part5/testing_react_apps".into(),
                    label: "2. Testing".into(),
                },
            ]
        );
    }

    #[test]
    fn extract_links_without_matches_is_empty() {
        let links = extract_links("<html><body><p>nothing</p></body></html>", "missing").unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn extract_links_fails_without_label() {
        let html = r#"<a class="arrow__wrapper--stacked" href="/en/part5/a">no label</a>"#;
        let err = extract_links(html, DEFAULT_ANCHOR_CLASS).expect_err("label missing");
        assert!(matches!(err, NotekitError::MissingElement(_)));
    }

    #[test]
    fn generate_writes_one_stub_per_anchor() {
        let temp = tempdir().unwrap();
        let fetcher = StubFetcher::new(&[(DEFAULT_BASE_URL, PART5)]);

        let report = generate_stubs(&fetcher, &config_in(temp.path())).unwrap();

        assert_eq!(report.stubs.len(), 2);
        assert!(report.skipped.is_empty());
        let intro = std::fs::read_to_string(temp.path().join("a intro.md")).unwrap();
        assert_eq!(intro, "# [ Intro](https://fullstackopen.com/en/part5/intro)");
        let testing =
            std::fs::read_to_string(temp.path().join("b testing react apps.md")).unwrap();
        assert_eq!(
            testing,
            "# [ Testing](https://fullstackopen.com/en/part5/testing_react_apps)"
        );
    }

    #[test]
    fn generate_overwrites_existing_stub() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a intro.md"), "stale contents").unwrap();
        let fetcher = StubFetcher::new(&[(DEFAULT_BASE_URL, PART5)]);

        generate_stubs(&fetcher, &config_in(temp.path())).unwrap();

        let intro = std::fs::read_to_string(temp.path().join("a intro.md")).unwrap();
        assert!(intro.starts_with("# [ Intro]"));
    }

    #[test]
    fn generate_propagates_fetch_failure() {
        let temp = tempdir().unwrap();
        let fetcher = StubFetcher::new(&[]);

        let err = generate_stubs(&fetcher, &config_in(temp.path())).expect_err("fetch fails");
        assert!(matches!(err, NotekitError::Fetch(_)));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn generate_rejects_invalid_base_url() {
        let temp = tempdir().unwrap();
        let fetcher = StubFetcher::new(&[]);
        let config = StubConfig {
            base_url: "not a url".into(),
            ..config_in(temp.path())
        };

        let err = generate_stubs(&fetcher, &config).expect_err("invalid url");
        assert!(matches!(err, NotekitError::InvalidUrl { .. }));
    }

    const BROKEN: &str = r#"
<a class="arrow__wrapper--stacked" href="/en/part5/first"><p>1. First</p></a>
<a class="arrow__wrapper--stacked" href="/en/part5/broken"><span>2. Broken</span></a>
<a class="arrow__wrapper--stacked" href="/en/part5/third"><p>3. Third</p></a>
"#;

    #[test]
    fn abort_policy_stops_at_first_broken_anchor() {
        let temp = tempdir().unwrap();

        let err = generate_stubs_from_html(BROKEN, &config_in(temp.path()))
            .expect_err("second anchor is broken");

        assert!(matches!(err, NotekitError::MissingElement(_)));
        assert!(temp.path().join("a first.md").is_file());
        assert!(!temp.path().join("c third.md").exists());
    }

    #[test]
    fn continue_policy_records_skips_and_keeps_letters() {
        let temp = tempdir().unwrap();
        let config = StubConfig {
            failure_policy: FailurePolicy::Continue,
            ..config_in(temp.path())
        };

        let report = generate_stubs_from_html(BROKEN, &config).unwrap();

        assert_eq!(report.stubs.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert!(temp.path().join("c third.md").is_file());
    }

    #[test]
    fn dry_run_plans_without_writing() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("stubs");
        let config = StubConfig {
            dry_run: true,
            ..config_in(&out)
        };

        let report = generate_stubs_from_html(PART5, &config).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.stubs[0].file_name, "a intro.md");
        assert!(!out.exists());
    }
}
