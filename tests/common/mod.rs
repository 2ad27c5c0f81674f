//! Shared fixtures: a recording host and the transactions page.

#![allow(dead_code)]

use livesearch::domain::{FetchFailure, ListFragment};
use livesearch::dom::MemoryDom;
use livesearch::search::{FetchRequest, Ticket};
use livesearch::{Config, Event, Host, Result, SearchController};
use std::time::Duration;
use url::Url;

/// One call the controller made on its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Arm(Ticket, Duration),
    Cancel(Ticket),
    Fetch(FetchRequest),
    Location(Url),
}

/// Host that records calls; tests play the timers and the network.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn fetches(&self) -> Vec<FetchRequest> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Fetch(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// The ticket of the most recently armed timer.
    pub fn last_armed(&self) -> Option<Ticket> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::Arm(ticket, _) => Some(*ticket),
            _ => None,
        })
    }

    pub fn locations(&self) -> Vec<Url> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Location(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    fn arm_timer(&mut self, ticket: Ticket, delay: Duration) -> Result<()> {
        self.calls.push(HostCall::Arm(ticket, delay));
        Ok(())
    }

    fn cancel_timer(&mut self, ticket: Ticket) -> Result<()> {
        self.calls.push(HostCall::Cancel(ticket));
        Ok(())
    }

    fn start_fetch(&mut self, request: FetchRequest) -> Result<()> {
        self.calls.push(HostCall::Fetch(request));
        Ok(())
    }

    fn replace_location(&mut self, url: &Url) -> Result<()> {
        self.calls.push(HostCall::Location(url.clone()));
        Ok(())
    }
}

pub const HREF: &str = "https://shop.test/transactions?page=1";

/// Transactions page as the server renders it.
pub fn page(query: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <button id="toggleNightMode"><i id="themeIcon" class="bi bi-moon"></i></button>
  <form id="transactionsSearchForm" method="get">
    <input type="text" name="q" class="form-control" value="{query}">
    <button type="button" id="clearSearchBtn" style="display:none">x</button>
  </form>
  <table class="table">
    <tbody id="transactionsRows">
      {rows}
    </tbody>
  </table>
  <div class="modal" id="editTransactionModal">
    <form>
      <input type="hidden" id="editTransactionId">
      <input type="text" id="editTransactionItem">
      <select id="editTransactionType"><option value="sale">sale</option></select>
      <input type="number" id="editTransactionQty">
    </form>
  </div>
</body>
</html>"#,
        rows = rows(&[("1", "Notebook"), ("2", "Stapler")]),
    )
}

/// Row markup the way the partial template renders it.
pub fn rows(records: &[(&str, &str)]) -> String {
    records
        .iter()
        .map(|(id, item)| {
            format!(
                r#"<tr class="table-row-with-toolbar" data-row="{id}">
  <td>{item}</td>
  <td>
    <div class="action-toolbar" style="opacity:0">
      <button class="btn" data-bs-toggle="tooltip" title="Edit">
        <span id="edit-{id}" data-bs-target="editTransactionModal" data-id="{id}" data-item="{item}" data-type="sale" data-qty="3">e</span>
      </button>
    </div>
  </td>
</tr>"#
            )
        })
        .collect()
}

pub type Controller = SearchController<MemoryDom, RecordingHost>;

pub fn mount(query: &str) -> Controller {
    let dom = MemoryDom::parse(&page(query)).unwrap();
    SearchController::mount(&Config::default(), dom, RecordingHost::default(), HREF).unwrap()
}

/// Lets the most recently armed timer fire.
pub fn elapse(controller: &mut Controller) {
    let ticket = controller.host().last_armed().unwrap();
    controller.dispatch(Event::DebounceElapsed { ticket });
}

/// Completes `request` with `outcome`.
pub fn respond(
    controller: &mut Controller,
    request: &FetchRequest,
    outcome: std::result::Result<ListFragment, FetchFailure>,
) {
    controller.dispatch(Event::FetchCompleted {
        seq: request.seq,
        query: request.query.clone(),
        outcome,
    });
}

pub fn fragment(records: &[(&str, &str)]) -> ListFragment {
    ListFragment::new(rows(records))
}
