/// Mutably borrows a `RefCell`, logging and evaluating to `None` if it is already borrowed
macro_rules! try_borrow_mut {
    ($cell:expr, $context:expr) => {
        match $cell.try_borrow_mut() {
            Ok(inner) => Some(inner),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    context = $context,
                    "in-memory storage is already in use"
                );
                None
            }
        }
    };
}

pub(crate) use try_borrow_mut;
