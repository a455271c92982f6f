//! Front-end state for the token creator.
//!
//! A front-end renders from [`CreatorController`] and drives it through its
//! transitions: input changes, image upload, and submit (which ends in
//! success or failure). Taking `&mut self` for submit means one attempt at
//! a time per controller; [`BusyFlag`] lets other observers see that an
//! attempt is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{CreatorError, PinError};
use crate::explorer::Explorer;
use crate::ledger::Ledger;
use crate::pinning::ImageUploader;
use crate::submit::{create_token, ConfirmationSettings, CreationReceipt};
use crate::types::{CreationOptions, FormField, TokenForm};
use crate::wallet::WalletAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub link: Option<String>,
}

impl Notification {
    fn success(message: impl Into<String>, link: Option<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            link,
        }
    }

    fn error(message: impl Into<String>, link: Option<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            link,
        }
    }
}

/// Shared, read-only view of whether a submission is in flight.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Sets the flag for its lifetime, so it clears on every exit path,
/// including a dropped future.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn enter(flag: &'a BusyFlag) -> Self {
        flag.0.store(true, Ordering::Release);
        Self(&flag.0)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct CreatorController<W, L> {
    wallet: W,
    ledger: L,
    settings: ConfirmationSettings,
    options: CreationOptions,
    explorer: Explorer,
    uploader: Option<ImageUploader>,
    form: TokenForm,
    busy: BusyFlag,
    created: Option<CreationReceipt>,
    notifications: Vec<Notification>,
}

impl<W: WalletAdapter, L: Ledger> CreatorController<W, L> {
    pub fn new(wallet: W, ledger: L, settings: ConfirmationSettings, explorer: Explorer) -> Self {
        Self {
            wallet,
            ledger,
            settings,
            options: CreationOptions::default(),
            explorer,
            uploader: None,
            form: TokenForm::default(),
            busy: BusyFlag::default(),
            created: None,
            notifications: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: CreationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_uploader(mut self, uploader: ImageUploader) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn form(&self) -> &TokenForm {
        &self.form
    }

    pub fn input(&mut self, field: FormField, value: &str) {
        self.form.apply(field, value);
    }

    pub fn is_in_progress(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.wallet.public_key().is_some() && !self.is_in_progress()
    }

    /// The most recently created token, if any.
    pub fn created(&self) -> Option<&CreationReceipt> {
        self.created.as_ref()
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Run one creation attempt with the current form.
    ///
    /// On success the form is reset and the receipt recorded. On failure
    /// the form is kept as entered and nothing is recorded.
    pub async fn submit(&mut self) -> Result<CreationReceipt, CreatorError> {
        let busy = self.busy.clone();
        let _guard = BusyGuard::enter(&busy);

        let result = create_token(
            &self.form,
            &self.options,
            &self.wallet,
            &self.ledger,
            &self.settings,
        )
        .await;

        match &result {
            Ok(receipt) => {
                info!(mint = %receipt.mint, "token created");
                self.notifications.push(Notification::success(
                    "Transaction sent!",
                    Some(self.explorer.transaction_url(&receipt.signature)),
                ));
                self.notifications.push(Notification::success(
                    "Token created successfully!",
                    Some(self.explorer.address_url(&receipt.mint)),
                ));
                self.created = Some(receipt.clone());
                self.form.reset();
            }
            Err(e) => {
                warn!(category = ?e.category(), error = %e, "token creation failed");
                let link = e.signature().map(|s| self.explorer.transaction_url(s));
                self.notifications
                    .push(Notification::error(e.notification_message(), link));
            }
        }
        result
    }

    /// Pin an image and use its gateway URL as the token URI.
    pub async fn upload_image(
        &mut self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, PinError> {
        let result = match &self.uploader {
            Some(uploader) => uploader.upload(bytes, content_type).await,
            None => Err(PinError::NotConfigured),
        };

        match &result {
            Ok(url) => {
                self.form.uri = url.clone();
                self.notifications
                    .push(Notification::success("Image uploaded successfully", None));
            }
            Err(e) => {
                warn!(error = %e, "image upload failed");
                self.notifications.push(Notification::error(e.to_string(), None));
            }
        }
        result
    }
}
