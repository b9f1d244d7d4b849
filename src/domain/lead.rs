//! Lead forms. Each form validates its own fields and renders the HTML message
//! the shop's chat receives.
//!
//! Messages use Telegram's HTML parse mode: bold titles, phone numbers in
//! `<code>` so staff can copy them with one tap. User text is escaped.

use super::entities::{Attachment, LeadPayload};
use super::errors::FormError;
use super::phone::PhoneEntry;
use chrono::NaiveDate;
use std::fmt::Write as _;

/// Photo cap for forms that accept attachments.
pub const MAX_PHOTOS: usize = 5;

/// Placeholder for optional fields left empty.
const NONE: &str = "-";

/// A form that can be submitted as a lead.
pub trait LeadForm: Send + Sync {
    /// Short name for logs.
    fn kind(&self) -> &'static str;

    /// Check required fields. Runs before anything is sent.
    fn validate(&self) -> Result<(), FormError>;

    /// Render the message and collect attachments.
    fn to_payload(&self) -> LeadPayload;
}

/// Escape the characters Telegram's HTML parser treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn or_none(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NONE.to_string()
    } else {
        escape_html(trimmed)
    }
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::MissingField(field))
    } else {
        Ok(())
    }
}

fn require_phone(phone: &PhoneEntry) -> Result<(), FormError> {
    if phone.is_valid() {
        Ok(())
    } else {
        Err(FormError::InvalidPhone)
    }
}

fn require_consent(consent: bool) -> Result<(), FormError> {
    if consent {
        Ok(())
    } else {
        Err(FormError::ConsentRequired)
    }
}

fn phone_line(phone: &PhoneEntry) -> String {
    format!("📞 Телефон: <code>{}</code>", escape_html(&phone.compact()))
}

/// Booking a repair slot.
#[derive(Debug, Clone, Default)]
pub struct RepairBooking {
    pub name: String,
    pub phone: PhoneEntry,
    pub desired_date: Option<NaiveDate>,
    pub comment: String,
    pub consent: bool,
}

impl RepairBooking {
    /// Validation against an explicit "today"; the desired date may not precede it.
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), FormError> {
        require(&self.name, "name")?;
        require_phone(&self.phone)?;
        if let Some(date) = self.desired_date {
            if date < today {
                return Err(FormError::DateInPast(date));
            }
        }
        require_consent(self.consent)
    }
}

impl LeadForm for RepairBooking {
    fn kind(&self) -> &'static str {
        "repair_booking"
    }

    fn validate(&self) -> Result<(), FormError> {
        self.validate_on(chrono::Local::now().date_naive())
    }

    fn to_payload(&self) -> LeadPayload {
        let date = self
            .desired_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NONE.to_string());
        let message = format!(
            "<b>Новая заявка на ремонт:</b>\n\n👤 Имя: {}\n{}\n📅 Желаемая дата: {}\n💬 Комментарий: {}",
            escape_html(self.name.trim()),
            phone_line(&self.phone),
            date,
            or_none(&self.comment),
        );
        LeadPayload::text(message)
    }
}

/// One answered quiz step. Multi-choice steps carry several choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer {
    pub step: String,
    pub choices: Vec<String>,
}

/// Damage-quote quiz: step answers, contact details and up to [`MAX_PHOTOS`] photos.
#[derive(Debug, Clone, Default)]
pub struct QuizRequest {
    pub name: String,
    pub phone: PhoneEntry,
    pub answers: Vec<QuizAnswer>,
    pub photos: Vec<Attachment>,
    pub consent: bool,
}

impl QuizRequest {
    /// Add a photo unless the cap is reached. Returns whether it was added.
    pub fn add_photo(&mut self, photo: Attachment) -> bool {
        if self.photos.len() >= MAX_PHOTOS {
            return false;
        }
        self.photos.push(photo);
        true
    }
}

impl LeadForm for QuizRequest {
    fn kind(&self) -> &'static str {
        "quiz"
    }

    fn validate(&self) -> Result<(), FormError> {
        require_phone(&self.phone)?;
        if self.photos.len() > MAX_PHOTOS {
            return Err(FormError::TooManyPhotos { max: MAX_PHOTOS });
        }
        require_consent(self.consent)
    }

    fn to_payload(&self) -> LeadPayload {
        let mut message = format!(
            "<b>Новая заявка с квиза</b>\n\n👤 Имя: {}\n{}\n",
            or_none(&self.name),
            phone_line(&self.phone),
        );
        if !self.photos.is_empty() {
            let _ = writeln!(message, "📸 Кол-во фотографий: {}", self.photos.len());
        }
        message.push_str("\nОтветы:");
        for answer in self.answers.iter().filter(|a| !a.choices.is_empty()) {
            let choices: Vec<String> = answer.choices.iter().map(|c| escape_html(c)).collect();
            let _ = write!(
                message,
                "\n🔹 {}: {}",
                escape_html(&answer.step),
                choices.join(", ")
            );
        }
        LeadPayload::with_attachments(message, self.photos.clone())
    }
}

/// Message from the contacts page.
#[derive(Debug, Clone, Default)]
pub struct ContactMessage {
    pub name: String,
    pub phone: PhoneEntry,
    pub email: String,
    pub message: String,
    pub consent: bool,
}

impl LeadForm for ContactMessage {
    fn kind(&self) -> &'static str {
        "contact"
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.name, "name")?;
        require_phone(&self.phone)?;
        require(&self.message, "message")?;
        require_consent(self.consent)
    }

    fn to_payload(&self) -> LeadPayload {
        LeadPayload::text(format!(
            "<b>Новое сообщение с сайта</b>\n👤 Имя: {}\n{}\n📧 Email: <code>{}</code>\n💬 Сообщение: {}",
            escape_html(self.name.trim()),
            phone_line(&self.phone),
            or_none(&self.email),
            escape_html(self.message.trim()),
        ))
    }
}

/// Call-back request for a specific service.
#[derive(Debug, Clone, Default)]
pub struct ServiceRequest {
    pub name: String,
    pub phone: PhoneEntry,
    /// Title of the chosen service, empty when none was picked.
    pub service: String,
}

impl LeadForm for ServiceRequest {
    fn kind(&self) -> &'static str {
        "service_request"
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.name, "name")?;
        require_phone(&self.phone)
    }

    fn to_payload(&self) -> LeadPayload {
        LeadPayload::text(format!(
            "<b>Новая заявка с сайта</b>\n\n👤 Имя: {}\n{}\n🔧 Услуга: {}",
            escape_html(self.name.trim()),
            phone_line(&self.phone),
            or_none(&self.service),
        ))
    }
}

/// Application for an open vacancy.
#[derive(Debug, Clone, Default)]
pub struct VacancyApplication {
    pub vacancy_title: String,
    pub name: String,
    pub phone: PhoneEntry,
    pub email: String,
    pub experience: String,
    pub consent: bool,
}

impl LeadForm for VacancyApplication {
    fn kind(&self) -> &'static str {
        "vacancy_application"
    }

    fn validate(&self) -> Result<(), FormError> {
        require(&self.name, "name")?;
        require_phone(&self.phone)?;
        require(&self.experience, "experience")?;
        require_consent(self.consent)
    }

    fn to_payload(&self) -> LeadPayload {
        LeadPayload::text(format!(
            "<b>Новый отклик на вакансию!</b>\n\nВакансия: {}\n\n👤 Имя: {}\n{}\n📧 Email: {}\n💼 Опыт работы: {}",
            or_none(&self.vacancy_title),
            escape_html(self.name.trim()),
            phone_line(&self.phone),
            or_none(&self.email),
            escape_html(self.experience.trim()),
        ))
    }
}

/// Customer review. Carries no phone number but is delivered like any other lead.
#[derive(Debug, Clone, Default)]
pub struct ReviewSubmission {
    /// Half-star steps from 0.5 to 5.
    pub rating: f32,
    pub name: String,
    pub car_model: String,
    pub work_type: String,
    pub text: String,
    pub consent: bool,
}

impl LeadForm for ReviewSubmission {
    fn kind(&self) -> &'static str {
        "review"
    }

    fn validate(&self) -> Result<(), FormError> {
        let doubled = self.rating * 2.0;
        if !(1.0..=10.0).contains(&doubled) || doubled.fract() != 0.0 {
            return Err(FormError::InvalidRating);
        }
        require(&self.name, "name")?;
        require(&self.text, "review")?;
        require_consent(self.consent)
    }

    fn to_payload(&self) -> LeadPayload {
        LeadPayload::text(format!(
            "<b>Новый отзыв:</b>\nРейтинг: {} ⭐\nИмя: {}\nАвтомобиль: {}\nВид работы: {}\nОтзыв: {}",
            self.rating,
            escape_html(self.name.trim()),
            or_none(&self.car_model),
            or_none(&self.work_type),
            escape_html(self.text.trim()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> PhoneEntry {
        PhoneEntry::from_input("375291234567")
    }

    fn photo(i: usize) -> Attachment {
        Attachment::new(format!("{i}.jpg"), "image/jpeg", vec![i as u8])
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_html("Иван"), "Иван");
    }

    #[test]
    fn test_repair_booking_message() {
        let form = RepairBooking {
            name: " Иван ".into(),
            phone: phone(),
            desired_date: NaiveDate::from_ymd_opt(2030, 5, 1),
            comment: String::new(),
            consent: true,
        };
        let today = NaiveDate::from_ymd_opt(2030, 4, 30).unwrap();
        assert!(form.validate_on(today).is_ok());

        let payload = form.to_payload();
        assert!(payload.attachments.is_empty());
        assert_eq!(
            payload.message,
            "<b>Новая заявка на ремонт:</b>\n\n👤 Имя: Иван\n📞 Телефон: <code>+375(29)123-45-67</code>\n📅 Желаемая дата: 2030-05-01\n💬 Комментарий: -"
        );
    }

    #[test]
    fn test_repair_booking_rejects_past_date() {
        let past = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let form = RepairBooking {
            name: "Иван".into(),
            phone: phone(),
            desired_date: Some(past),
            consent: true,
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(form.validate_on(today), Err(FormError::DateInPast(past)));
    }

    #[test]
    fn test_validation_order() {
        let mut form = ContactMessage::default();
        assert_eq!(form.validate(), Err(FormError::MissingField("name")));
        form.name = "Анна".into();
        form.phone = PhoneEntry::from_input("37529123");
        assert_eq!(form.validate(), Err(FormError::InvalidPhone));
        form.phone = phone();
        assert_eq!(form.validate(), Err(FormError::MissingField("message")));
        form.message = "Когда можно приехать?".into();
        assert_eq!(form.validate(), Err(FormError::ConsentRequired));
        form.consent = true;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_quiz_message_and_photos() {
        let mut form = QuizRequest {
            name: "Иван".into(),
            phone: phone(),
            answers: vec![
                QuizAnswer {
                    step: "Тип повреждения".into(),
                    choices: vec!["Вмятина".into(), "Царапина".into()],
                },
                QuizAnswer {
                    step: "Марка".into(),
                    choices: vec![],
                },
            ],
            consent: true,
            ..Default::default()
        };
        for i in 0..3 {
            assert!(form.add_photo(photo(i)));
        }
        assert!(form.validate().is_ok());

        let payload = form.to_payload();
        assert_eq!(payload.attachments.len(), 3);
        assert!(payload.message.contains("📸 Кол-во фотографий: 3\n"));
        assert!(payload.message.ends_with("Ответы:\n🔹 Тип повреждения: Вмятина, Царапина"));
        assert!(!payload.message.contains("Марка"));
    }

    #[test]
    fn test_quiz_photo_cap() {
        let mut form = QuizRequest::default();
        for i in 0..MAX_PHOTOS {
            assert!(form.add_photo(photo(i)));
        }
        assert!(!form.add_photo(photo(99)));
        assert_eq!(form.photos.len(), MAX_PHOTOS);

        form.photos.push(photo(100));
        form.phone = phone();
        form.consent = true;
        assert_eq!(
            form.validate(),
            Err(FormError::TooManyPhotos { max: MAX_PHOTOS })
        );
    }

    #[test]
    fn test_quiz_without_photos_has_no_count_line() {
        let form = QuizRequest {
            phone: phone(),
            consent: true,
            ..Default::default()
        };
        let payload = form.to_payload();
        assert!(!payload.message.contains("📸"));
        assert!(payload.message.contains("👤 Имя: -"));
    }

    #[test]
    fn test_service_request_without_service() {
        let form = ServiceRequest {
            name: "Олег".into(),
            phone: phone(),
            service: "  ".into(),
        };
        assert!(form.validate().is_ok());
        assert!(form.to_payload().message.ends_with("🔧 Услуга: -"));
    }

    #[test]
    fn test_vacancy_application_escapes_input() {
        let form = VacancyApplication {
            vacancy_title: "Маляр".into(),
            name: "<b>Пётр</b>".into(),
            phone: phone(),
            email: String::new(),
            experience: "5 лет".into(),
            consent: true,
        };
        assert!(form.validate().is_ok());
        let message = form.to_payload().message;
        assert!(message.contains("👤 Имя: &lt;b&gt;Пётр&lt;/b&gt;"));
        assert!(message.contains("📧 Email: -"));
        assert!(message.contains("Вакансия: Маляр"));
    }

    #[test]
    fn test_review_rating_steps() {
        let mut form = ReviewSubmission {
            rating: 4.5,
            name: "Мария".into(),
            text: "Отлично".into(),
            consent: true,
            ..Default::default()
        };
        assert!(form.validate().is_ok());
        assert!(form.to_payload().message.contains("Рейтинг: 4.5 ⭐"));

        for bad in [0.0, 4.3, 5.5, -1.0] {
            form.rating = bad;
            assert_eq!(form.validate(), Err(FormError::InvalidRating), "rating {bad}");
        }
        form.rating = 5.0;
        assert!(form.to_payload().message.contains("Рейтинг: 5 ⭐"));
    }
}
