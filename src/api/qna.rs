use super::StorefrontApi;
use crate::domain::model::{CreateInquiryRequest, Inquiry, InquiryStatus, UpdateInquiryRequest};
use crate::domain::ports::{BrowserStorage, Navigator};
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::validate_required_text;
use reqwest::Method;

pub const INQUIRY_TITLE_MAX: usize = 100;
pub const INQUIRY_CONTENT_MAX: usize = 2000;

impl<S, N> StorefrontApi<S, N>
where
    S: BrowserStorage + 'static,
    N: Navigator + 'static,
{
    pub async fn list_inquiries(&self) -> Result<Vec<Inquiry>> {
        self.get_authorized("/qna").await
    }

    pub async fn get_inquiry(&self, inquiry_id: i64) -> Result<Inquiry> {
        self.get_authorized(&format!("/qna/{}", inquiry_id)).await
    }

    pub async fn create_inquiry(&self, request: &CreateInquiryRequest) -> Result<Inquiry> {
        validate_required_text("title", &request.title, INQUIRY_TITLE_MAX)?;
        validate_required_text("content", &request.content, INQUIRY_CONTENT_MAX)?;
        self.send_authorized_json(Method::POST, "/qna", request)
            .await
    }

    /// 已回覆的詢問不能再修改
    pub async fn update_inquiry(
        &self,
        inquiry_id: i64,
        request: &UpdateInquiryRequest,
    ) -> Result<Inquiry> {
        if let Some(title) = &request.title {
            validate_required_text("title", title, INQUIRY_TITLE_MAX)?;
        }
        if let Some(content) = &request.content {
            validate_required_text("content", content, INQUIRY_CONTENT_MAX)?;
        }

        let current = self.get_inquiry(inquiry_id).await?;
        if current.status == InquiryStatus::Answered {
            return Err(StorefrontError::validation(
                "status",
                "Answered inquiries can no longer be edited.",
            ));
        }

        self.send_authorized_json(Method::PATCH, &format!("/qna/{}", inquiry_id), request)
            .await
    }

    pub async fn delete_inquiry(&self, inquiry_id: i64) -> Result<()> {
        self.delete_authorized(&format!("/qna/{}", inquiry_id))
            .await
    }
}
