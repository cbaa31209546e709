pub mod aggregate;

pub use aggregate::{
    ApplyMovementDto, MovementDirection, MovementReportPage, MovementReportQuery,
    MovementRequest, StockMovement, StockMovementId, MAX_MOVEMENT_QUANTITY,
};
