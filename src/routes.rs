use crate::rules::Rules;
use crate::scheme::Scheme;
use crate::url;
use http_body_util::Empty;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, LOCATION};
use hyper::{Request, Response, StatusCode};

pub struct State {
    pub scheme: Scheme,
    pub status: StatusCode,
    pub rules: Rules,
}

pub async fn respond_to_request<B>(req: Request<B>, state: &State) -> Response<Empty<Bytes>> {
    let full_url = url::from_request(state.scheme, &req);
    log::info!("Intercepted {} {}", req.method(), full_url);

    match state.rules.try_match(&full_url) {
        Some(Ok(target)) => match HeaderValue::from_str(&target) {
            Ok(location) => {
                log::info!(
                    "{} {} -> [{}] {}",
                    req.method(),
                    full_url,
                    state.status.as_u16(),
                    target
                );
                let mut resp = empty_response(state.status);
                resp.headers_mut().insert(LOCATION, location);
                resp
            }
            Err(e) => {
                log::warn!(
                    "{} {} -> [invalid location] {:?} : {}",
                    req.method(),
                    full_url,
                    target,
                    e
                );
                empty_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        },
        Some(Err(e)) => {
            log::warn!("{} {} -> [synthesis error] : {}", req.method(), full_url, e);
            empty_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
        None => {
            log::info!("{} {} -> [no match]", req.method(), full_url);
            empty_response(StatusCode::NOT_FOUND)
        }
    }
}

fn empty_response(status: StatusCode) -> Response<Empty<Bytes>> {
    let mut resp = Response::new(Empty::new());
    *resp.status_mut() = status;
    resp
}
