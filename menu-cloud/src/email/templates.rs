//! Plain-text email bodies
//!
//! Pure builders: every function returns a [`Mail`] and performs no I/O.

use shared::error::ErrorCode;
use shared::models::Decision;

const BRAND: &str = "Store Menu";
const SEPARATOR: &str = "\n\n-----\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub subject: String,
    pub body: String,
}

impl Mail {
    fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Language variant for admin-triggered notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmailTemplate {
    #[default]
    Bilingual,
    Ar,
    En,
}

impl EmailTemplate {
    /// Empty input selects the default
    pub fn parse(s: &str) -> Result<Self, ErrorCode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "bilingual" => Ok(Self::Bilingual),
            "ar" => Ok(Self::Ar),
            "en" => Ok(Self::En),
            _ => Err(ErrorCode::InvalidEmailTemplate),
        }
    }

    fn pick(self, en: Mail, ar: Mail, bilingual_subject: &str) -> Mail {
        match self {
            Self::En => en,
            Self::Ar => ar,
            Self::Bilingual => Mail::new(
                bilingual_subject,
                format!("{}{SEPARATOR}{}", en.body, ar.body),
            ),
        }
    }
}

fn display_name(name: &str) -> &str {
    let name = name.trim();
    if name.is_empty() { "Business" } else { name }
}

fn signature_en() -> String {
    format!("\nBest regards,\n{BRAND} Team")
}

fn signature_ar() -> String {
    format!("\nمع التحية،\nفريق {BRAND}")
}

/// Sent to the merchant right after registration; carries the verification code
pub fn registration_received(business_name: &str, otp: &str, expires_minutes: i64) -> Mail {
    let name = display_name(business_name);
    let mut body = format!("Hello {name},\n\n");
    body.push_str(&format!("Thank you for registering with {BRAND}.\n"));
    body.push_str(&format!("Your verification code is: {otp}\n"));
    body.push_str(&format!("This code expires in {expires_minutes} minutes.\n"));
    body.push_str("Once your email is verified, your request will be reviewed within 12 to 24 hours.\n");
    body.push_str("You will receive another email once your account is approved.");
    body.push_str(SEPARATOR);
    body.push_str(&format!("مرحبًا {name}،\n\n"));
    body.push_str(&format!("نشكر لك تسجيلك في {BRAND}.\n"));
    body.push_str(&format!("رمز التحقق الخاص بك هو: {otp}\n"));
    body.push_str(&format!("تنتهي صلاحية هذا الرمز خلال {expires_minutes} دقائق.\n"));
    body.push_str("المدة المتوقعة للاعتماد بعد التحقق: من 12 إلى 24 ساعة.\n");
    body.push_str("سيصلك بريد إلكتروني آخر فور اعتماد حسابك.\n");
    body.push_str(&signature_ar());
    Mail::new("Registration received - under review", body)
}

/// Fresh verification code after a resend request
pub fn verification_code(business_name: &str, otp: &str, expires_minutes: i64) -> Mail {
    let name = display_name(business_name);
    let mut body = format!("Hello {name},\n\n");
    body.push_str(&format!("Your new {BRAND} verification code is: {otp}\n"));
    body.push_str(&format!("This code expires in {expires_minutes} minutes.\n"));
    body.push_str(SEPARATOR.trim_start_matches('\n'));
    body.push_str(&format!("مرحبًا {name}،\n\n"));
    body.push_str(&format!("رمز التحقق الجديد الخاص بك هو: {otp}\n"));
    body.push_str(&format!("تنتهي صلاحية هذا الرمز خلال {expires_minutes} دقائق.\n"));
    body.push_str(&signature_ar());
    Mail::new("Your verification code | رمز التحقق", body)
}

pub fn admin_registration_alert(
    business_name: &str,
    email: &str,
    phone: &str,
    panel_url: &str,
) -> Mail {
    let body = format!(
        "A new business registration request has been submitted.\n\n\
         Business name: {business_name}\n\
         Email: {email}\n\
         Phone: {phone}\n\n\
         Review and approve/reject from:\n{panel_url}\n"
    );
    Mail::new("New registration request requires approval", body)
}

/// Links embedded in merchant-facing notifications
#[derive(Debug, Clone, Copy)]
pub struct Links<'a> {
    pub login_url: &'a str,
    pub menu_url: &'a str,
    pub support_email: &'a str,
}

pub fn registration_decision(
    business_name: &str,
    decision: Decision,
    template: EmailTemplate,
    links: Links<'_>,
) -> Mail {
    let name = display_name(business_name);
    let menu_url = links.menu_url.trim();
    let support = links.support_email;
    let approved = decision == Decision::Approved;

    let mut en = format!("Hello {name},\n\n");
    let mut ar = format!("مرحبًا {name}،\n\n");
    if approved {
        en.push_str("Great news. Your registration request has been approved.\n");
        en.push_str("You can now sign in and start managing your digital menu.\n");
        en.push_str(&format!("Dashboard login: {}\n", links.login_url));
        ar.push_str("يسعدنا إبلاغك بأنه تم اعتماد طلب التسجيل الخاص بك.\n");
        ar.push_str("يمكنك الآن تسجيل الدخول والبدء بإدارة قائمة الطعام الرقمية الخاصة بك.\n");
        ar.push_str(&format!("رابط تسجيل الدخول للوحة التحكم: {}\n", links.login_url));
        if !menu_url.is_empty() {
            en.push_str(&format!("Public menu link: {menu_url}\n"));
            ar.push_str(&format!("رابط القائمة العامة: {menu_url}\n"));
        }
        en.push_str(&format!("If you need help, contact support at {support}.\n"));
        ar.push_str(&format!("لأي مساعدة يمكنك التواصل عبر: {support}.\n"));
    } else {
        en.push_str(&format!("Thank you for your interest in {BRAND}.\n"));
        en.push_str("After review, your registration request was not approved at this time.\n");
        en.push_str(&format!("You may contact support at {support} for assistance.\n"));
        ar.push_str(&format!("نشكر اهتمامك بخدمة {BRAND}.\n"));
        ar.push_str("بعد مراجعة الطلب، تعذر اعتماد طلب التسجيل في الوقت الحالي.\n");
        ar.push_str(&format!("يمكنك التواصل مع الدعم عبر: {support}.\n"));
    }
    en.push_str(&signature_en());
    ar.push_str(&signature_ar());

    let (subject_en, subject_ar, subject_both) = if approved {
        (
            format!("Your {BRAND} account has been approved"),
            format!("تم اعتماد حسابك في {BRAND}"),
            "Your account has been approved | تم اعتماد حسابك",
        )
    } else {
        (
            format!("Update on your {BRAND} registration request"),
            format!("تحديث بخصوص طلب التسجيل في {BRAND}"),
            "Registration request update | تحديث طلب التسجيل",
        )
    };

    template.pick(
        Mail::new(subject_en, en),
        Mail::new(subject_ar, ar),
        subject_both,
    )
}

pub fn menu_access_changed(
    business_name: &str,
    menu_enabled: bool,
    template: EmailTemplate,
    menu_url: &str,
) -> Mail {
    let name = display_name(business_name);
    let menu_url = menu_url.trim();

    let mut en = format!("Hello {name},\n\n");
    let mut ar = format!("مرحبًا {name}،\n\n");
    if menu_enabled {
        en.push_str("Your menu is now active and visible to customers.\n");
        ar.push_str("قائمة الطعام الخاصة بك أصبحت مفعلة الآن ومرئية للعملاء.\n");
        if !menu_url.is_empty() {
            en.push_str(&format!("Public menu link: {menu_url}\n"));
            ar.push_str(&format!("رابط القائمة العامة: {menu_url}\n"));
        }
    } else {
        en.push_str("Your menu is currently disabled and not visible to customers.\n");
        en.push_str("Please contact support if this was unexpected.\n");
        ar.push_str("قائمة الطعام الخاصة بك غير مفعلة حاليًا وغير مرئية للعملاء.\n");
        ar.push_str("يرجى التواصل مع الدعم إذا كان هذا الإجراء غير متوقع.\n");
    }
    en.push_str(&signature_en());
    ar.push_str(&signature_ar());

    let (subject_en, subject_ar, subject_both) = if menu_enabled {
        (
            "Your menu has been activated",
            "تم تفعيل قائمتك",
            "Menu activated | تم تفعيل القائمة",
        )
    } else {
        (
            "Your menu has been deactivated",
            "تم إلغاء تفعيل قائمتك",
            "Menu deactivated | تم إلغاء تفعيل القائمة",
        )
    };

    template.pick(
        Mail::new(subject_en, en),
        Mail::new(subject_ar, ar),
        subject_both,
    )
}

pub fn password_reset(business_name: &str, otp: &str, expires_minutes: i64) -> Mail {
    let name = display_name(business_name);
    let mut body = format!("Hello {name},\n\n");
    body.push_str(&format!(
        "We received a password reset request for your {BRAND} account.\n"
    ));
    body.push_str(&format!("Your OTP code is: {otp}\n"));
    body.push_str(&format!("This code expires in {expires_minutes} minutes.\n"));
    body.push_str("If you did not request this, please ignore this email.");
    body.push_str(SEPARATOR);
    body.push_str(&format!("مرحبًا {name}،\n\n"));
    body.push_str(&format!(
        "استلمنا طلبًا لإعادة تعيين كلمة المرور لحسابك في {BRAND}.\n"
    ));
    body.push_str(&format!("رمز التحقق الخاص بك هو: {otp}\n"));
    body.push_str(&format!(
        "تنتهي صلاحية هذا الرمز خلال {expires_minutes} دقائق.\n"
    ));
    body.push_str("إذا لم تطلب ذلك، يمكنك تجاهل هذه الرسالة.\n");
    body.push_str(&signature_ar());
    Mail::new("Password reset code", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINKS: Links<'static> = Links {
        login_url: "http://panel.test/login",
        menu_url: "http://menu.test/Menu/cafe",
        support_email: "support@storemenu.test",
    };

    #[test]
    fn test_template_parse() {
        assert_eq!(EmailTemplate::parse(""), Ok(EmailTemplate::Bilingual));
        assert_eq!(EmailTemplate::parse("bilingual"), Ok(EmailTemplate::Bilingual));
        assert_eq!(EmailTemplate::parse("AR"), Ok(EmailTemplate::Ar));
        assert_eq!(EmailTemplate::parse("en"), Ok(EmailTemplate::En));
        assert_eq!(
            EmailTemplate::parse("fr"),
            Err(ErrorCode::InvalidEmailTemplate)
        );
    }

    #[test]
    fn test_decision_variants() {
        let en = registration_decision("Cafe", Decision::Approved, EmailTemplate::En, LINKS);
        assert_eq!(en.subject, "Your Store Menu account has been approved");
        assert!(en.body.contains("Dashboard login: http://panel.test/login"));
        assert!(en.body.contains("Public menu link: http://menu.test/Menu/cafe"));
        assert!(en.body.contains("support@storemenu.test"));
        assert!(!en.body.contains("-----"));

        let ar = registration_decision("Cafe", Decision::Rejected, EmailTemplate::Ar, LINKS);
        assert_eq!(ar.subject, "تحديث بخصوص طلب التسجيل في Store Menu");
        assert!(!ar.body.contains("http://panel.test/login"));

        let both =
            registration_decision("Cafe", Decision::Approved, EmailTemplate::Bilingual, LINKS);
        assert_eq!(both.subject, "Your account has been approved | تم اعتماد حسابك");
        assert_eq!(both.body, format!("{}{SEPARATOR}{}", en.body, registration_decision("Cafe", Decision::Approved, EmailTemplate::Ar, LINKS).body));
    }

    #[test]
    fn test_rejection_omits_links() {
        for template in [EmailTemplate::En, EmailTemplate::Ar, EmailTemplate::Bilingual] {
            let mail = registration_decision("Cafe", Decision::Rejected, template, LINKS);
            assert!(!mail.body.contains(LINKS.menu_url));
            assert!(!mail.body.contains(LINKS.login_url));
            assert!(mail.body.contains("support@storemenu.test"));
        }
        let mail = registration_decision("Cafe", Decision::Rejected, EmailTemplate::En, LINKS);
        assert!(mail.body.contains("was not approved"));
    }

    #[test]
    fn test_menu_link_omitted_when_empty() {
        let links = Links {
            menu_url: "  ",
            ..LINKS
        };
        let mail = registration_decision("Cafe", Decision::Approved, EmailTemplate::En, links);
        assert!(!mail.body.contains("Public menu link"));
    }

    #[test]
    fn test_menu_access_changed() {
        let on = menu_access_changed("Cafe", true, EmailTemplate::Bilingual, "http://m/x");
        assert_eq!(on.subject, "Menu activated | تم تفعيل القائمة");
        assert!(on.body.contains("Public menu link: http://m/x"));

        let off = menu_access_changed("Cafe", false, EmailTemplate::En, "http://m/x");
        assert_eq!(off.subject, "Your menu has been deactivated");
        assert!(!off.body.contains("http://m/x"));
    }

    #[test]
    fn test_codes_are_embedded() {
        let mail = registration_received("", "123456", 5);
        assert!(mail.body.starts_with("Hello Business,"));
        assert!(mail.body.contains("123456"));
        assert!(mail.body.contains("5 minutes"));

        let mail = password_reset("Cafe", "654321", 5);
        assert_eq!(mail.subject, "Password reset code");
        assert!(mail.body.contains("654321"));

        assert!(verification_code("Cafe", "111222", 5).body.contains("111222"));
    }

    #[test]
    fn test_admin_alert() {
        let mail = admin_registration_alert("Cafe", "o@cafe.com", "+1", "http://panel");
        assert_eq!(mail.subject, "New registration request requires approval");
        assert!(mail.body.contains("Business name: Cafe"));
        assert!(mail.body.contains("http://panel"));
    }
}
