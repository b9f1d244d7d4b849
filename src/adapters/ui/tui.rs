//! Implements InputPort. Inquire-based lead desk: pick a form, fill it, submit.
//!
//! The phone prompt follows the site's input mask: seeded on focus, masked on
//! every change, accepted only with a complete number.

use super::progress::delivery_spinner;
use crate::domain::{
    Attachment, ContactMessage, DomainError, FormError, LeadForm, MAX_PHOTOS, PhoneEntry, Quiz,
    QuizAnswer, QuizRequest, RepairBooking, ReviewSubmission, ServiceRequest, VacancyApplication,
};
use crate::ports::{InputPort, LeadNotifier};
use crate::usecases::LeadService;
use async_trait::async_trait;
use chrono::NaiveDate;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::validator::Validation;
use inquire::{Confirm, InquireError, MultiSelect, Select, Text};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Applies the prompt theme globally.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightBlue))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(Color::LightRed))
        .with_answer(StyleSheet::new().with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Menu {
    Repair,
    Quiz,
    Contact,
    Service,
    Vacancy,
    Review,
    Exit,
}

impl Menu {
    const ALL: [Menu; 7] = [
        Menu::Repair,
        Menu::Quiz,
        Menu::Contact,
        Menu::Service,
        Menu::Vacancy,
        Menu::Review,
        Menu::Exit,
    ];
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Menu::Repair => "Запись на ремонт",
            Menu::Quiz => "Расчёт стоимости (квиз с фото)",
            Menu::Contact => "Сообщение с сайта",
            Menu::Service => "Заявка на услугу",
            Menu::Vacancy => "Отклик на вакансию",
            Menu::Review => "Отзыв",
            Menu::Exit => "Выход",
        };
        f.write_str(label)
    }
}

/// Inline hint shown next to a rejected form, in the site's wording.
fn form_error_hint(err: &FormError) -> String {
    match err {
        FormError::MissingField(field) => format!("Поле обязательно для заполнения: {}", field),
        FormError::InvalidPhone => "Введите полный номер телефона".to_string(),
        FormError::ConsentRequired => "Необходимо ваше согласие".to_string(),
        FormError::TooManyPhotos { max } => format!("Можно прикрепить не более {} фото", max),
        FormError::InvalidRating => "Поставьте оценку от 0.5 до 5".to_string(),
        FormError::DateInPast(date) => format!("Дата {} уже прошла", date),
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    /// One submit lifecycle per form; forms never block each other.
    leads: HashMap<Menu, LeadService>,
    quiz: Quiz,
}

impl TuiInputPort {
    pub fn new(notifier: Arc<dyn LeadNotifier>, quiz: Quiz) -> Self {
        let leads = Menu::ALL
            .into_iter()
            .filter(|menu| *menu != Menu::Exit)
            .map(|menu| (menu, LeadService::new(Arc::clone(&notifier))))
            .collect();
        Self { leads, quiz }
    }

    async fn fill(&self, menu: Menu) -> Result<Box<dyn LeadForm>, InquireError> {
        let form: Box<dyn LeadForm> = match menu {
            Menu::Repair => Box::new(fill_repair()?),
            Menu::Quiz => Box::new(self.fill_quiz().await?),
            Menu::Contact => Box::new(fill_contact()?),
            Menu::Service => Box::new(fill_service()?),
            Menu::Vacancy => Box::new(fill_vacancy()?),
            Menu::Review => Box::new(fill_review()?),
            Menu::Exit => return Err(InquireError::OperationCanceled),
        };
        Ok(form)
    }

    async fn fill_quiz(&self) -> Result<QuizRequest, InquireError> {
        let mut form = QuizRequest::default();
        for step in &self.quiz.steps {
            let choices = if step.multiple {
                MultiSelect::new(&step.title, step.options.clone()).prompt()?
            } else {
                vec![Select::new(&step.title, step.options.clone()).prompt()?]
            };
            form.answers.push(QuizAnswer {
                step: step.title.clone(),
                choices,
            });
        }

        while form.photos.len() < MAX_PHOTOS {
            let path = Text::new(&format!(
                "Фото повреждения ({}/{}), путь к файлу (пусто — дальше):",
                form.photos.len(),
                MAX_PHOTOS
            ))
            .prompt()?;
            let path = path.trim();
            if path.is_empty() {
                break;
            }
            match read_photo(Path::new(path)).await {
                Ok(photo) => {
                    form.add_photo(photo);
                }
                Err(e) => {
                    warn!(path, error = %e, "cannot read photo");
                    println!("Не удалось прочитать файл: {}", e);
                }
            }
        }

        form.name = Text::new("Ваше имя:").prompt()?;
        form.phone = prompt_phone()?;
        form.consent = prompt_consent()?;
        Ok(form)
    }

    /// Submit with a spinner; on delivery failure the user may resend the same form.
    async fn submit(&self, menu: Menu, form: &dyn LeadForm) -> Result<(), InquireError> {
        let Some(leads) = self.leads.get(&menu) else {
            return Err(InquireError::OperationCanceled);
        };
        loop {
            let spinner = delivery_spinner("Отправляется...");
            let result = leads.submit(form).await;
            spinner.finish_and_clear();

            match result {
                Ok(()) => {
                    println!("✔ Заявка отправлена! Мы свяжемся с вами в ближайшее время.");
                    return Ok(());
                }
                Err(DomainError::Form(e)) => {
                    println!("✘ {}", form_error_hint(&e));
                    return Ok(());
                }
                Err(e) => {
                    warn!(error = %e, "submit failed");
                    println!("✘ Произошла ошибка при отправке формы.");
                    let retry = Confirm::new("Попробовать ещё раз?")
                        .with_default(true)
                        .prompt()?;
                    if !retry {
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn prompt_phone() -> Result<PhoneEntry, InquireError> {
    let focused = PhoneEntry::new().on_focus();
    let raw = Text::new("Телефон:")
        .with_initial_value(focused.as_str())
        .with_formatter(&|input: &str| PhoneEntry::seeded().on_change(input).to_string())
        .with_validator(|input: &str| {
            if PhoneEntry::seeded().on_change(input).is_valid() {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Введите полный номер телефона".into()))
            }
        })
        .prompt()?;
    Ok(focused.on_change(&raw))
}

fn prompt_required(label: &str) -> Result<String, InquireError> {
    Text::new(label)
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid("Поле обязательно для заполнения".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()
}

fn prompt_optional(label: &str) -> Result<String, InquireError> {
    Text::new(label).with_help_message("необязательно").prompt()
}

fn prompt_consent() -> Result<bool, InquireError> {
    Confirm::new("Я согласен на обработку персональных данных")
        .with_default(false)
        .prompt()
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

fn fill_repair() -> Result<RepairBooking, InquireError> {
    let name = prompt_required("Ваше имя:")?;
    let phone = prompt_phone()?;
    let date = Text::new("Желаемая дата (ГГГГ-ММ-ДД):")
        .with_help_message("необязательно")
        .with_validator(|input: &str| {
            if input.trim().is_empty() || parse_date(input).is_some() {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Формат даты: 2025-06-30".into()))
            }
        })
        .prompt()?;
    let comment = prompt_optional("Комментарий:")?;
    let consent = prompt_consent()?;
    Ok(RepairBooking {
        name,
        phone,
        desired_date: parse_date(&date),
        comment,
        consent,
    })
}

fn fill_contact() -> Result<ContactMessage, InquireError> {
    Ok(ContactMessage {
        name: prompt_required("Ваше имя:")?,
        phone: prompt_phone()?,
        email: prompt_optional("Email:")?,
        message: prompt_required("Сообщение:")?,
        consent: prompt_consent()?,
    })
}

fn fill_service() -> Result<ServiceRequest, InquireError> {
    Ok(ServiceRequest {
        name: prompt_required("Ваше имя:")?,
        phone: prompt_phone()?,
        service: prompt_optional("Услуга:")?,
    })
}

fn fill_vacancy() -> Result<VacancyApplication, InquireError> {
    Ok(VacancyApplication {
        vacancy_title: prompt_required("Вакансия:")?,
        name: prompt_required("Ваше имя:")?,
        phone: prompt_phone()?,
        email: prompt_optional("Email:")?,
        experience: prompt_required("Опыт работы:")?,
        consent: prompt_consent()?,
    })
}

fn fill_review() -> Result<ReviewSubmission, InquireError> {
    let ratings: Vec<f32> = (1..=10).rev().map(|half| half as f32 / 2.0).collect();
    let rating = Select::new("Оценка:", ratings).prompt()?;
    Ok(ReviewSubmission {
        rating,
        name: prompt_required("Ваше имя:")?,
        car_model: prompt_optional("Автомобиль:")?,
        work_type: prompt_optional("Вид работы:")?,
        text: prompt_required("Отзыв:")?,
        consent: prompt_consent()?,
    })
}

/// Load a photo from disk; MIME type comes from the extension.
async fn read_photo(path: &Path) -> std::io::Result<Attachment> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo.jpg".to_string());
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    Ok(Attachment::new(
        file_name,
        Attachment::mime_for_extension(ext),
        bytes,
    ))
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = match Select::new("Выберите форму", Menu::ALL.to_vec()).prompt() {
                Ok(choice) => choice,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(DomainError::Ui(e.to_string())),
            };
            if choice == Menu::Exit {
                return Ok(());
            }

            let outcome = match self.fill(choice).await {
                Ok(form) => self.submit(choice, form.as_ref()).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => {}
                // Esc leaves the form and returns to the menu
                Err(InquireError::OperationCanceled) => continue,
                Err(InquireError::OperationInterrupted) => return Ok(()),
                Err(e) => return Err(DomainError::Ui(e.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::telegram::DryRunNotifier;
    use crate::domain::SubmitState;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2025-06-30 "), NaiveDate::from_ymd_opt(2025, 6, 30));
        assert_eq!(parse_date("30.06.2025"), None);
    }

    #[test]
    fn test_form_error_hint() {
        assert_eq!(
            form_error_hint(&FormError::InvalidPhone),
            "Введите полный номер телефона"
        );
        assert_eq!(
            form_error_hint(&FormError::TooManyPhotos { max: MAX_PHOTOS }),
            "Можно прикрепить не более 5 фото"
        );
    }

    #[test]
    fn test_menu_lists_exit_last() {
        assert_eq!(Menu::ALL.last(), Some(&Menu::Exit));
        assert_eq!(Menu::Quiz.to_string(), "Расчёт стоимости (квиз с фото)");
    }

    #[tokio::test]
    async fn test_each_form_has_its_own_submit_state() {
        let notifier: Arc<dyn LeadNotifier> = Arc::new(DryRunNotifier::with_delay(0));
        let port = TuiInputPort::new(notifier, Quiz { steps: Vec::new() });
        assert_eq!(port.leads.len(), Menu::ALL.len() - 1);
        assert!(!port.leads.contains_key(&Menu::Exit));

        let service = ServiceRequest {
            name: "Иван".into(),
            phone: PhoneEntry::from_input("+375291234567"),
            service: String::new(),
        };
        port.leads[&Menu::Service].submit(&service).await.unwrap();

        assert_eq!(port.leads[&Menu::Service].state(), SubmitState::Delivered);
        assert_eq!(port.leads[&Menu::Contact].state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn test_read_photo_mime_from_extension() {
        let path = std::env::temp_dir().join("bodyshop_leads_read_photo_test.png");
        tokio::fs::write(&path, b"not really a png").await.unwrap();
        let photo = read_photo(&path).await.unwrap();
        assert_eq!(photo.mime, "image/png");
        assert_eq!(photo.file_name, "bodyshop_leads_read_photo_test.png");
        assert_eq!(photo.bytes, b"not really a png");
        let _ = tokio::fs::remove_file(&path).await;
    }
}
