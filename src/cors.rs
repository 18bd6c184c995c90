use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Header, Method, Status},
    Request, Response,
};

/// Browser origins allowed to call the API.
#[derive(Clone, Debug, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parses a comma-separated origin list; a `*` entry allows every origin.
    pub fn parse(origins: &str) -> Self {
        let origins: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(origins) => origins.iter().any(|allowed| allowed == origin),
        }
    }
}

/// Response fairing applying the cross-origin policy and answering preflight requests.
pub struct Cors {
    origins: AllowedOrigins,
}

impl Cors {
    pub fn new(origins: AllowedOrigins) -> Self {
        Self { origins }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-Origin Resource Sharing",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let origin = match request.headers().get_one("Origin") {
            Some(origin) if self.origins.allows(origin) => origin,
            _ => return,
        };

        // Credentials are allowed, so the origin is echoed rather than `*`
        response.set_header(Header::new(
            "Access-Control-Allow-Origin",
            origin.to_owned(),
        ));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
        response.set_header(Header::new("Vary", "Origin"));

        let is_preflight = request.method() == Method::Options
            && request
                .headers()
                .contains("Access-Control-Request-Method");
        if is_preflight {
            let allowed_headers = request
                .headers()
                .get_one("Access-Control-Request-Headers")
                .unwrap_or("*")
                .to_owned();
            response.set_header(Header::new(
                "Access-Control-Allow-Methods",
                "GET, POST, OPTIONS",
            ));
            response.set_header(Header::new("Access-Control-Allow-Headers", allowed_headers));
            response.set_header(Header::new("Access-Control-Max-Age", "600"));
            response.set_status(Status::Ok);
            response.remove_header("Content-Type");
            response.set_sized_body(0, std::io::Cursor::new(""));
        }
    }
}
