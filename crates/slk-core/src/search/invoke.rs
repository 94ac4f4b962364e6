//! Search invocation against a transport.

use std::fmt;
use std::future::Future;

use crate::CoreError;
use crate::output::Output;

use super::model::{FileMatch, MatchSet, MessageMatch, SearchResult};
use super::options::{SearchOptions, SortBy, SortDirection};
use super::render::render;

/// Which search endpoint to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// `search.messages`
    Messages,
    /// `search.files`
    Files,
}

impl SearchKind {
    /// Plural noun used in user-facing messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Parameters handed to the transport for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRequest<'a> {
    /// Query string, including any `in:`/`from:` modifiers.
    pub query: &'a str,
    /// Results per page.
    pub count: u32,
    /// One-based page index.
    pub page: u32,
    /// Sort field.
    pub sort: SortBy,
    /// Sort direction.
    pub sort_dir: SortDirection,
    /// Highlight matching terms.
    pub highlight: bool,
}

impl<'a> SearchRequest<'a> {
    /// Build a request from a query and validated options.
    #[must_use]
    pub const fn new(query: &'a str, opts: &SearchOptions) -> Self {
        Self {
            query,
            count: opts.count(),
            page: opts.page(),
            sort: opts.sort(),
            sort_dir: opts.sort_dir(),
            highlight: opts.highlight(),
        }
    }
}

/// Something that can run message and file searches.
///
/// [`SlackClient`](crate::slack::SlackClient) talks to the Web API; tests
/// substitute their own implementations.
pub trait SearchTransport {
    /// Search messages.
    fn search_messages(
        &self,
        request: &SearchRequest<'_>,
    ) -> impl Future<Output = Result<MatchSet<MessageMatch>, CoreError>> + Send;

    /// Search files.
    fn search_files(
        &self,
        request: &SearchRequest<'_>,
    ) -> impl Future<Output = Result<MatchSet<FileMatch>, CoreError>> + Send;
}

impl<T> SearchTransport for &T
where
    T: SearchTransport + Sync + ?Sized,
{
    fn search_messages(
        &self,
        request: &SearchRequest<'_>,
    ) -> impl Future<Output = Result<MatchSet<MessageMatch>, CoreError>> + Send {
        (**self).search_messages(request)
    }

    fn search_files(
        &self,
        request: &SearchRequest<'_>,
    ) -> impl Future<Output = Result<MatchSet<FileMatch>, CoreError>> + Send {
        (**self).search_files(request)
    }
}

/// Run one search of the given kind.
///
/// Makes exactly one request; transport errors are returned as-is.
///
/// # Errors
///
/// Returns whatever error the transport reports.
pub async fn search<T>(
    transport: &T,
    kind: SearchKind,
    query: &str,
    opts: &SearchOptions,
) -> Result<SearchResult, CoreError>
where
    T: SearchTransport + Sync,
{
    let request = SearchRequest::new(query, opts);
    log::debug!(
        "search.{kind}: query={query:?} count={} page={} sort={} sort_dir={} highlight={}",
        request.count,
        request.page,
        request.sort,
        request.sort_dir,
        request.highlight
    );

    let result = match kind {
        SearchKind::Messages => SearchResult::Messages(transport.search_messages(&request).await?),
        SearchKind::Files => SearchResult::Files(transport.search_files(&request).await?),
    };

    log::debug!(
        "search.{kind}: {} of {} matches on page {}",
        result.len(),
        result.total(),
        result.paging().page
    );
    Ok(result)
}

/// Raw, unvalidated option values as they arrive from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOptions<'a> {
    /// Results per page.
    pub count: i64,
    /// One-based page index.
    pub page: i64,
    /// Sort field.
    pub sort: &'a str,
    /// Sort direction.
    pub sort_dir: &'a str,
    /// Highlight matching terms.
    pub highlight: bool,
}

/// Validate, search, and render in one step.
///
/// Options are validated first; on failure neither `transport` nor
/// `factory` is touched. When no transport is supplied, `factory` builds one.
///
/// # Errors
///
/// Returns validation, transport-construction, transport, or render errors.
pub async fn run_search<T, F, O>(
    kind: SearchKind,
    query: &str,
    raw: RawOptions<'_>,
    transport: Option<T>,
    factory: F,
    out: &mut O,
) -> Result<(), CoreError>
where
    T: SearchTransport + Sync,
    F: FnOnce() -> Result<T, CoreError>,
    O: Output,
{
    let opts = SearchOptions::new(raw.count, raw.page, raw.sort, raw.sort_dir, raw.highlight)?;
    let transport = match transport {
        Some(transport) => transport,
        None => factory()?,
    };
    let result = search(&transport, kind, query, &opts).await?;
    render(&result, query, out)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::output::{OutputFormat, Printer};
    use crate::search::model::PagingInfo;

    #[derive(Debug, Default)]
    struct StubTransport {
        files: Vec<FileMatch>,
        total: u32,
        fail: bool,
        seen: Mutex<Vec<(&'static str, String, u32, u32, String, String, bool)>>,
    }

    impl StubTransport {
        fn record(&self, endpoint: &'static str, request: &SearchRequest<'_>) {
            self.seen.lock().expect("lock").push((
                endpoint,
                request.query.to_string(),
                request.count,
                request.page,
                request.sort.to_string(),
                request.sort_dir.to_string(),
                request.highlight,
            ));
        }

        fn calls(&self) -> usize {
            self.seen.lock().expect("lock").len()
        }
    }

    impl SearchTransport for StubTransport {
        async fn search_messages(
            &self,
            request: &SearchRequest<'_>,
        ) -> Result<MatchSet<MessageMatch>, CoreError> {
            self.record("messages", request);
            if self.fail {
                return Err(CoreError::Api("search.messages: invalid_auth".into()));
            }
            Ok(MatchSet::default())
        }

        async fn search_files(
            &self,
            request: &SearchRequest<'_>,
        ) -> Result<MatchSet<FileMatch>, CoreError> {
            self.record("files", request);
            if self.fail {
                return Err(CoreError::Api("search.files: ratelimited".into()));
            }
            Ok(MatchSet {
                total: self.total,
                matches: self.files.clone(),
                paging: PagingInfo {
                    count: request.count,
                    total: self.total,
                    page: request.page,
                    pages: self.total.div_ceil(request.count),
                },
            })
        }
    }

    fn defaults() -> RawOptions<'static> {
        RawOptions {
            count: 20,
            page: 1,
            sort: "score",
            sort_dir: "desc",
            highlight: false,
        }
    }

    fn printer(format: OutputFormat) -> Printer<Vec<u8>> {
        Printer::new(Vec::new(), format, false)
    }

    fn text(printer: Printer<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).expect("utf8")
    }

    #[tokio::test]
    async fn search_forwards_every_option() {
        let stub = StubTransport::default();
        let opts = SearchOptions::new(50, 4, "timestamp", "asc", true).expect("valid");

        let result = search(&stub, SearchKind::Messages, "from:@alice", &opts)
            .await
            .expect("search");

        assert_eq!(result.kind(), SearchKind::Messages);
        let seen = stub.seen.lock().expect("lock");
        assert_eq!(
            seen.as_slice(),
            &[(
                "messages",
                "from:@alice".to_string(),
                50,
                4,
                "timestamp".to_string(),
                "asc".to_string(),
                true
            )]
        );
    }

    #[tokio::test]
    async fn search_dispatches_files_once() {
        let stub = StubTransport {
            total: 3,
            files: vec![FileMatch::default(); 3],
            ..StubTransport::default()
        };
        let opts = SearchOptions::new(20, 1, "score", "desc", false).expect("valid");

        let result = search(&stub, SearchKind::Files, "type:pdf", &opts)
            .await
            .expect("search");

        assert_eq!(result.kind(), SearchKind::Files);
        assert_eq!(result.len(), 3);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let stub = StubTransport {
            fail: true,
            ..StubTransport::default()
        };
        let opts = SearchOptions::new(20, 1, "score", "desc", false).expect("valid");

        let err = search(&stub, SearchKind::Files, "q", &opts)
            .await
            .expect_err("should fail");
        assert_eq!(err.to_string(), "API error: search.files: ratelimited");
    }

    #[tokio::test]
    async fn validation_failure_skips_transport_and_factory() {
        let stub = StubTransport::default();
        let mut out = printer(OutputFormat::Text);
        let raw = RawOptions {
            count: 0,
            ..defaults()
        };

        let err = run_search(
            SearchKind::Messages,
            "q",
            raw,
            Some(&stub),
            || -> Result<&StubTransport, CoreError> { panic!("factory must not run") },
            &mut out,
        )
        .await
        .expect_err("invalid count");

        assert!(matches!(
            err,
            CoreError::Validation(crate::search::ValidationError::InvalidCount(0))
        ));
        assert_eq!(stub.calls(), 0);
        assert!(text(out).is_empty());
    }

    #[tokio::test]
    async fn factory_builds_transport_when_none_is_injected() {
        let mut out = printer(OutputFormat::Text);
        let mut built = false;

        run_search(
            SearchKind::Messages,
            "deploy",
            defaults(),
            None,
            || {
                built = true;
                Ok(StubTransport::default())
            },
            &mut out,
        )
        .await
        .expect("run");

        assert!(built);
        assert_eq!(text(out), "No messages found for \"deploy\"\n");
    }

    #[tokio::test]
    async fn factory_errors_surface_after_validation() {
        let mut out = printer(OutputFormat::Text);

        let err = run_search(
            SearchKind::Files,
            "q",
            defaults(),
            None::<StubTransport>,
            || Err(CoreError::Auth("no Slack token configured".into())),
            &mut out,
        )
        .await
        .expect_err("factory fails");

        assert!(matches!(err, CoreError::Auth(_)));
    }

    #[tokio::test]
    async fn finance_scenario_end_to_end() {
        let stub = StubTransport {
            total: 45,
            files: vec![
                FileMatch {
                    name: "Q3 report.pdf".into(),
                    filetype: "pdf".into(),
                    user: "U1".into(),
                    created: 1_700_000_000,
                    title: "Quarterly report Q3".into(),
                    ..FileMatch::default()
                },
                FileMatch {
                    name: "Q3 numbers.xlsx".into(),
                    filetype: "xlsx".into(),
                    user: "U2".into(),
                    created: 1_700_086_400,
                    title: "Numbers".into(),
                    ..FileMatch::default()
                },
            ],
            ..StubTransport::default()
        };
        let mut out = printer(OutputFormat::Text);

        run_search(
            SearchKind::Files,
            "in:#finance quarterly report",
            defaults(),
            Some(&stub),
            || -> Result<&StubTransport, CoreError> { panic!("factory must not run") },
            &mut out,
        )
        .await
        .expect("run");

        let rendered = text(out);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines[0],
            "Found 45 files matching \"in:#finance quarterly report\""
        );
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("NAME"));
        assert!(lines[3].starts_with("Q3 report.pdf"));
        assert!(lines[4].starts_with("Q3 numbers.xlsx"));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Page 1 of 3 (showing 2 of 45 results)");
        assert_eq!(lines.len(), 7);
    }
}
