//! A scripted stand-in for a bank's web server.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{self, header, HeaderMap, Method, StatusCode, Uri},
    response::Response,
    Router,
};
use ibank::citibank::Credentials;
use reqwest::Url;
use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

pub const SIGNON: &str = "CZGCB/JSO/signon/DisplayUsernameSignon.do";
pub const CREDENTIALS: &str = "CZGCB/JSO/signon/ProcessUsernameSignon.do";
pub const SECOND_FACTOR: &str = "CZGCB/JPS/apps/otpstc/StcMain.do";
pub const INITIALIZE: &str = "CZGCB/jba/daa/InitializeSubApp.do";

/// A request the portal received.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    /// Relative to the portal's root, without the leading slash.
    pub path: String,
    pub form: HashMap<String, String>,
    pub cookie: Option<String>,
}

impl Recorded {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    pub fn has_cookie(&self, pair: &str) -> bool {
        self.cookie
            .as_deref()
            .map_or(false, |cookies| cookies.split("; ").any(|c| c == pair))
    }
}

/// The canned answer for a route.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
    set_cookie: Option<&'static str>,
}

impl Reply {
    pub fn html(body: impl Into<String>) -> Self {
        Reply {
            status: StatusCode::OK,
            content_type: "text/html; charset=UTF-8",
            body: body.into().into_bytes(),
            set_cookie: None,
        }
    }

    pub fn download(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Reply {
            status: StatusCode::OK,
            content_type,
            body: body.into(),
            set_cookie: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Reply {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: "text/html; charset=UTF-8",
            body: b"<html><body>Error</body></html>".to_vec(),
            set_cookie: None,
        }
    }

    pub fn with_cookie(mut self, set_cookie: &'static str) -> Self {
        self.set_cookie = Some(set_cookie);
        self
    }
}

type Handler = Box<dyn Fn(&Recorded) -> Reply + Send + Sync>;

struct Portal {
    routes: HashMap<String, Handler>,
    requests: Mutex<Vec<Recorded>>,
}

/// Assembles the routes of a [`MockPortal`].
#[derive(Default)]
pub struct MockPortalBuilder {
    routes: HashMap<String, Handler>,
}

impl MockPortalBuilder {
    /// Always answer `path` the same way.
    pub fn reply(self, path: &str, reply: Reply) -> Self {
        self.route(path, move |_| reply.clone())
    }

    /// Answer `path` depending on the request.
    pub fn route<F>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        self.routes.insert(path.to_string(), Box::new(handler));
        self
    }

    /// Start serving on a random local port.
    pub async fn start(self) -> MockPortal {
        let portal = Arc::new(Portal {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&portal));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockPortal {
            base_url: Url::parse(&format!("http://{}/", address)).unwrap(),
            portal,
        }
    }
}

/// A running mock portal.
pub struct MockPortal {
    pub base_url: Url,
    portal: Arc<Portal>,
}

impl MockPortal {
    pub fn builder() -> MockPortalBuilder { MockPortalBuilder::default() }

    /// Everything received so far, oldest first.
    pub fn requests(&self) -> Vec<Recorded> {
        self.portal.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// The last request made to `path`.
    pub fn last_request(&self, path: &str) -> Option<Recorded> {
        self.requests().into_iter().rev().find(|r| r.path == path)
    }
}

async fn handle(
    State(portal): State<Arc<Portal>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        path: uri.path().trim_start_matches('/').to_string(),
        form: url::form_urlencoded::parse(&body).into_owned().collect(),
        cookie: headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    };

    let reply = match portal.routes.get(&recorded.path) {
        Some(handler) => handler(&recorded),
        None => Reply::status(404),
    };
    portal.requests.lock().unwrap().push(recorded);

    let mut response = http::Response::builder()
        .status(reply.status)
        .header(header::CONTENT_TYPE, reply.content_type);
    if let Some(set_cookie) = reply.set_cookie {
        response = response.header(header::SET_COOKIE, set_cookie);
    }

    response.body(Body::from(reply.body)).unwrap()
}

/// A page carrying a sync token, the way every portal page does.
pub fn page_with_token(token: &str, text: &str) -> String {
    format!(
        r#"<html><body><form name="Form"><input type="hidden" name="SYNC_TOKEN" value="{}"></form><p>{}</p></body></html>"#,
        token, text
    )
}

/// Hands out fixed credentials and remembers what was asked for.
#[derive(Debug, Default)]
pub struct Recording {
    pub asked: Vec<&'static str>,
}

impl Credentials for Recording {
    fn username(&mut self) -> io::Result<String> {
        self.asked.push("username");
        Ok(String::from("jan.novak"))
    }

    fn password(&mut self) -> io::Result<String> {
        self.asked.push("password");
        Ok(String::from("hunter2"))
    }

    fn second_factor(&mut self) -> io::Result<String> {
        self.asked.push("second factor");
        Ok(String::from("12345678"))
    }
}

/// A Citibank portal which logs in "jan.novak" / "hunter2" / "12345678" and
/// then recognises the session by its cookie.
pub fn citibank_portal() -> MockPortalBuilder {
    MockPortal::builder()
        .reply(
            SIGNON,
            Reply::html(page_with_token("first", "Přihlášení"))
                .with_cookie("JSESSIONID=anonymous; Path=/"),
        )
        .route(CREDENTIALS, |req| {
            if req.field("password") == Some("hunter2") {
                Reply::html(page_with_token("second", "Zadejte SMS heslo"))
            } else {
                Reply::html(page_with_token("again", "Litujeme, špatné heslo"))
            }
        })
        .route(SECOND_FACTOR, |req| {
            if req.field("secureTxnCode") == Some("12345678") {
                Reply::html(page_with_token("third", "Vítejte"))
                    .with_cookie("JSESSIONID=authenticated; Path=/; HttpOnly")
            } else {
                Reply::html(page_with_token("again", "Zadejte SMS heslo"))
            }
        })
        .route(INITIALIZE, |req| {
            if req.has_cookie("JSESSIONID=authenticated") {
                Reply::html("<html><body>Stažení pohybů</body></html>")
            } else {
                Reply::html(r#"<form name="SignonForm"></form>"#)
            }
        })
}
