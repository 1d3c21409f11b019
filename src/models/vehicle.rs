//! Vehicle and vehicle type definitions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::TimeWindow;

/// A vehicle type: capacity and cost parameters shared by many vehicles.
///
/// # Examples
///
/// ```
/// use vrp_lns::models::VehicleType;
///
/// let vt = VehicleType::new(0, 80)
///     .with_cost_per_distance(1.0)
///     .with_fixed_cost(50.0);
/// assert_eq!(vt.capacity(), 80);
/// assert_eq!(vt.fixed_cost(), 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    id: usize,
    capacity: i32,
    fixed_cost: f64,
    cost_per_distance: f64,
    cost_per_time: f64,
}

impl VehicleType {
    /// Creates a vehicle type with the given id and capacity.
    ///
    /// Default: cost_per_distance = 1.0, no fixed cost, no time cost.
    pub fn new(id: usize, capacity: i32) -> Self {
        Self {
            id,
            capacity,
            fixed_cost: 0.0,
            cost_per_distance: 1.0,
            cost_per_time: 0.0,
        }
    }

    /// Sets the fixed cost for using a vehicle of this type.
    pub fn with_fixed_cost(mut self, cost: f64) -> Self {
        self.fixed_cost = cost;
        self
    }

    /// Sets cost per unit distance.
    pub fn with_cost_per_distance(mut self, cost: f64) -> Self {
        self.cost_per_distance = cost;
        self
    }

    /// Sets cost per unit travel/service time.
    pub fn with_cost_per_time(mut self, cost: f64) -> Self {
        self.cost_per_time = cost;
        self
    }

    /// Type id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Fixed cost for using a vehicle of this type (independent of distance).
    pub fn fixed_cost(&self) -> f64 {
        self.fixed_cost
    }

    /// Cost per unit distance traveled.
    pub fn cost_per_distance(&self) -> f64 {
        self.cost_per_distance
    }

    /// Cost per unit route duration.
    pub fn cost_per_time(&self) -> f64 {
        self.cost_per_time
    }
}

/// A vehicle stationed at a depot, referencing a shared [`VehicleType`].
///
/// Routes start and end at the vehicle's depot. An optional operating
/// window bounds the earliest departure and the latest return.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vrp_lns::models::{Vehicle, VehicleType};
///
/// let vt = Arc::new(VehicleType::new(0, 80));
/// let v = Vehicle::new(0, 20.0, 20.0, vt.clone());
/// assert_eq!(v.capacity(), 80);
/// assert_eq!(v.depot(), (20.0, 20.0));
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: usize,
    depot_x: f64,
    depot_y: f64,
    vehicle_type: Arc<VehicleType>,
    operating_window: Option<TimeWindow>,
}

impl Vehicle {
    /// Creates a vehicle with the given id, depot coordinates, and type.
    pub fn new(id: usize, depot_x: f64, depot_y: f64, vehicle_type: Arc<VehicleType>) -> Self {
        Self {
            id,
            depot_x,
            depot_y,
            vehicle_type,
            operating_window: None,
        }
    }

    /// Sets the operating window (earliest departure, latest return).
    pub fn with_operating_window(mut self, tw: TimeWindow) -> Self {
        self.operating_window = Some(tw);
        self
    }

    /// Vehicle id (index in the problem).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Depot coordinates (start and end of every route of this vehicle).
    pub fn depot(&self) -> (f64, f64) {
        (self.depot_x, self.depot_y)
    }

    /// The shared vehicle type.
    pub fn vehicle_type(&self) -> &Arc<VehicleType> {
        &self.vehicle_type
    }

    /// Capacity, from the vehicle type.
    pub fn capacity(&self) -> i32 {
        self.vehicle_type.capacity
    }

    /// Fixed cost, from the vehicle type.
    pub fn fixed_cost(&self) -> f64 {
        self.vehicle_type.fixed_cost
    }

    /// Cost per unit distance, from the vehicle type.
    pub fn cost_per_distance(&self) -> f64 {
        self.vehicle_type.cost_per_distance
    }

    /// Cost per unit route duration, from the vehicle type.
    pub fn cost_per_time(&self) -> f64 {
        self.vehicle_type.cost_per_time
    }

    /// Operating window, if any.
    pub fn operating_window(&self) -> Option<&TimeWindow> {
        self.operating_window.as_ref()
    }
}
