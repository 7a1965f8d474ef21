//! Transport tests against a throwaway local HTTP server.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use sales_dash::app::pipeline::{LoadPhase, Loader};
use sales_dash::dashboard::DashboardView;
use sales_dash::data::{HttpSource, JsonpSource, SalesSource};
use sales_dash::domain::{DateRange, TransportKind};
use sales_dash::error::FetchError;
use serde_json::json;

struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
    delay: Duration,
}

impl Reply {
    fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    fn script(body: String) -> Self {
        Self {
            status: 200,
            content_type: "application/javascript",
            body,
            delay: Duration::ZERO,
        }
    }

    fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: "error".to_string(),
            delay: Duration::ZERO,
        }
    }
}

/// Serve every connection with `handler(request_target)`; returns the base URL.
fn serve<F>(handler: F) -> String
where
    F: Fn(&str) -> Reply + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            handle(stream, &handler);
        }
    });
    format!("http://{addr}/exec")
}

fn handle<F: Fn(&str) -> Reply>(stream: TcpStream, handler: &F) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers.
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line == "\r\n" => break,
            Ok(_) => {}
        }
    }

    let target = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
    let reply = handler(&target);
    thread::sleep(reply.delay);

    let mut stream = reader.into_inner();
    let head = format!(
        "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reply.content_type,
        reply.body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(reply.body.as_bytes());
}

fn query_param<'a>(target: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = target.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

fn range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 9, 3).unwrap(),
    )
    .unwrap()
}

fn sample_payload() -> serde_json::Value {
    json!({
        "daily": [
            {"date": "2025-09-01", "sales": 150},
            {"date": "2025-09-03", "sales": "20"}
        ],
        "totalOrders": 3,
        "totalSales": 170
    })
}

#[test]
fn direct_fetch_sends_range_and_returns_json() {
    let url = serve(|target| {
        assert_eq!(query_param(target, "start"), Some("2025-09-01"));
        assert_eq!(query_param(target, "end"), Some("2025-09-03"));
        Reply::json(sample_payload())
    });
    let source = HttpSource::new(url.clone()).unwrap();
    assert_eq!(source.endpoint(), url);
    assert_eq!(source.kind(), TransportKind::Direct);
    assert_eq!(source.fetch(&range()).unwrap(), sample_payload());
}

#[test]
fn direct_fetch_reports_status() {
    let url = serve(|_| Reply::status(500));
    let err = HttpSource::new(url).unwrap().fetch(&range()).unwrap_err();
    assert_eq!(err, FetchError::Status(500));
}

#[test]
fn direct_fetch_rejects_non_json_body() {
    let url = serve(|_| Reply::script("not json".to_string()));
    let err = HttpSource::new(url).unwrap().fetch(&range()).unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[test]
fn fallback_unwraps_the_requested_callback() {
    let url = serve(|target| {
        let callback = query_param(target, "callback").unwrap_or("missing").to_string();
        Reply::script(format!("/**/{callback}({});", sample_payload()))
    });
    let source = JsonpSource::new(url, Duration::from_secs(5)).unwrap();
    assert_eq!(source.timeout(), Duration::from_secs(5));
    assert_eq!(source.kind(), TransportKind::Jsonp);
    assert_eq!(source.fetch(&range()).unwrap(), sample_payload());
}

#[test]
fn fallback_gives_up_after_its_timeout() {
    let url = serve(|target| {
        let callback = query_param(target, "callback").unwrap_or("missing").to_string();
        Reply {
            delay: Duration::from_secs(3),
            ..Reply::script(format!("{callback}({{}})"))
        }
    });
    let timeout = Duration::from_millis(200);
    let err = JsonpSource::new(url, timeout).unwrap().fetch(&range()).unwrap_err();
    assert_eq!(err, FetchError::FallbackTimeout(timeout));
}

#[test]
fn loader_falls_back_after_primary_error() {
    let url = serve(|target| match query_param(target, "callback") {
        Some(callback) => Reply::script(format!("{callback}({})", sample_payload())),
        None => Reply::status(500),
    });

    let primary: Box<dyn SalesSource> = Box::new(HttpSource::new(url.clone()).unwrap());
    let fallback: Box<dyn SalesSource> = Box::new(JsonpSource::new(url, Duration::from_secs(5)).unwrap());
    let loader = Loader::new(primary, Some(fallback));

    let mut view = DashboardView::default();
    let mut phases = Vec::new();
    let out = loader
        .load(&mut view, &range(), &mut |phase| phases.push(phase))
        .unwrap();

    assert_eq!(out.transport, TransportKind::Jsonp);
    assert_eq!(out.series.values(), vec![150.0, 0.0, 20.0]);
    assert_eq!(view.kpis.total_orders, "3");
    assert_eq!(view.kpis.total_sales, "170 FCFA");
    assert_eq!(view.chart().map(|c| c.generation()), Some(1));
    assert_eq!(
        phases,
        vec![
            LoadPhase::Fetching,
            LoadPhase::FetchFailed,
            LoadPhase::FallbackFetching,
            LoadPhase::Fetched,
            LoadPhase::Rendering,
            LoadPhase::Idle,
        ]
    );
}

#[test]
fn loader_reports_both_failures() {
    let url = serve(|_| Reply::status(503));

    let primary: Box<dyn SalesSource> = Box::new(HttpSource::new(url.clone()).unwrap());
    let fallback: Box<dyn SalesSource> = Box::new(JsonpSource::new(url, Duration::from_secs(5)).unwrap());
    let loader = Loader::new(primary, Some(fallback));

    let mut view = DashboardView::default();
    let err = loader.load(&mut view, &range(), &mut |_| {}).unwrap_err();

    assert_eq!(err.primary, FetchError::Status(503));
    assert!(matches!(err.fallback, Some(FetchError::FallbackTransport(_))));
    assert!(view.message.is_some());
    assert!(view.chart().is_none());
}
