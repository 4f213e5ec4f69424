use thiserror::Error;

use crate::input::actions::LogicalInput;

pub type Result<T> = std::result::Result<T, OxrError>;

#[derive(Error, Debug)]
pub enum OxrError {
    #[error("OpenXR error: {0}")]
    OpenXrError(#[from] openxr::sys::Result),
    #[error("Runtime reported zero swapchain images")]
    NoSwapchainImages,
    #[error("Runtime acquired swapchain image {index}, but only {count} images exist")]
    ImageIndexOutOfRange { index: u32, count: usize },
    #[error("Expected no acquired image. release_image not called?")]
    AlreadyAcquired,
    #[error("Expected an acquired image. acquire_image not called?")]
    NotAcquired,
    #[error("Swapchain used before init")]
    SwapchainNotInitialized,
    #[error("Input mapper used before initialize")]
    InputNotInitialized,
    #[error("Action {0:?} was never created")]
    MissingAction(LogicalInput),
    #[error("Action {0:?} queried with the wrong action type")]
    WrongActionType(LogicalInput),
}
