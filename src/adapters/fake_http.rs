//! Scripted [`HttpClient`] for adapter unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::app::ports::{HttpClient, HttpResponse};
use crate::error::CommsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

pub struct FakeHttp {
    replies: VecDeque<Result<HttpResponse, CommsError>>,
    requests: Rc<RefCell<Vec<Request>>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self {
            replies: VecDeque::new(),
            requests: Rc::default(),
        }
    }

    pub fn ok(body: &[u8]) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &[u8]) -> Self {
        Self::new().then(Ok(HttpResponse {
            status,
            body: body.to_vec(),
        }))
    }

    pub fn failing(err: CommsError) -> Self {
        Self::new().then(Err(err))
    }

    pub fn then(mut self, reply: Result<HttpResponse, CommsError>) -> Self {
        self.replies.push_back(reply);
        self
    }

    /// Shared log of every request made, readable after the fake is moved.
    pub fn requests(&self) -> Rc<RefCell<Vec<Request>>> {
        Rc::clone(&self.requests)
    }
}

impl HttpClient for FakeHttp {
    fn get(&mut self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, CommsError> {
        self.requests.borrow_mut().push(Request {
            url: url.to_owned(),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        });
        self.replies.pop_front().unwrap_or(Err(CommsError::RequestFailed))
    }
}
