//! Service request and time window types.

use serde::{Deserialize, Serialize};

/// A time window constraint for service at a location.
///
/// The vehicle must arrive no later than `due` and may arrive as early as
/// `ready` (waiting is allowed if early).
///
/// # Examples
///
/// ```
/// use vrp_lns::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest allowable arrival time.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowable arrival time.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Returns the waiting time if arriving at the given time.
    ///
    /// Zero if the vehicle arrives within or after the window.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.ready {
            self.ready - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if arriving at the given time violates this window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.due
    }
}

/// A customer service request in a routing problem.
///
/// A request has a location (coordinates), a demand, a service duration,
/// and an optional time window. Requests are immutable after construction
/// and identified by a dense id (their index in the problem).
///
/// # Examples
///
/// ```
/// use vrp_lns::models::Request;
///
/// let r = Request::new(0, 41.0, 49.0, 10, 10.0);
/// assert_eq!(r.id(), 0);
/// assert_eq!(r.demand(), 10);
/// assert!(r.time_window().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    id: usize,
    x: f64,
    y: f64,
    demand: i32,
    service_duration: f64,
    time_window: Option<TimeWindow>,
}

impl Request {
    /// Creates a new request.
    pub fn new(id: usize, x: f64, y: f64, demand: i32, service_duration: f64) -> Self {
        Self {
            id,
            x,
            y,
            demand,
            service_duration,
            time_window: None,
        }
    }

    /// Sets a time window for this request.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Request id (index in the problem).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate of the service location.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate of the service location.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Demand at this request (units to deliver or pick up).
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Service duration at this request.
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    /// Time window constraint, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }
}
