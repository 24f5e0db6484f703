//! Supported payout currencies and the banking fields each one requires

use super::{Branch, Dependency, FieldDescriptor, SchemaError};
use std::fmt;
use std::str::FromStr;

/// ISO 4217 currencies a reimbursement can be paid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Currency {
    Aed,
    Ars,
    Aud,
    Bdt,
    Bgn,
    Brl,
    Cad,
    Chf,
    Clp,
    Cny,
    Czk,
    Dkk,
    Egp,
    Eur,
    Gbp,
    Gel,
    Ghs,
    Hkd,
    Hrk,
    Huf,
    Idr,
    Ils,
    Inr,
    Jpy,
    Kes,
    Krw,
    Lkr,
    Mad,
    Mxn,
    Myr,
    Ngn,
    Nok,
    Npr,
    Nzd,
    Pen,
    Php,
    Pkr,
    Pln,
    Ron,
    Rub,
    Sek,
    Sgd,
    Thb,
    Try,
    Tzs,
    Uah,
    Ugx,
    Usd,
    Vnd,
    Zar,
}

impl Currency {
    /// Every supported currency, ordered by code
    pub const ALL: [Currency; 50] = [
        Currency::Aed,
        Currency::Ars,
        Currency::Aud,
        Currency::Bdt,
        Currency::Bgn,
        Currency::Brl,
        Currency::Cad,
        Currency::Chf,
        Currency::Clp,
        Currency::Cny,
        Currency::Czk,
        Currency::Dkk,
        Currency::Egp,
        Currency::Eur,
        Currency::Gbp,
        Currency::Gel,
        Currency::Ghs,
        Currency::Hkd,
        Currency::Hrk,
        Currency::Huf,
        Currency::Idr,
        Currency::Ils,
        Currency::Inr,
        Currency::Jpy,
        Currency::Kes,
        Currency::Krw,
        Currency::Lkr,
        Currency::Mad,
        Currency::Mxn,
        Currency::Myr,
        Currency::Ngn,
        Currency::Nok,
        Currency::Npr,
        Currency::Nzd,
        Currency::Pen,
        Currency::Php,
        Currency::Pkr,
        Currency::Pln,
        Currency::Ron,
        Currency::Rub,
        Currency::Sek,
        Currency::Sgd,
        Currency::Thb,
        Currency::Try,
        Currency::Tzs,
        Currency::Uah,
        Currency::Ugx,
        Currency::Usd,
        Currency::Vnd,
        Currency::Zar,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Aed => "AED",
            Self::Ars => "ARS",
            Self::Aud => "AUD",
            Self::Bdt => "BDT",
            Self::Bgn => "BGN",
            Self::Brl => "BRL",
            Self::Cad => "CAD",
            Self::Chf => "CHF",
            Self::Clp => "CLP",
            Self::Cny => "CNY",
            Self::Czk => "CZK",
            Self::Dkk => "DKK",
            Self::Egp => "EGP",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Gel => "GEL",
            Self::Ghs => "GHS",
            Self::Hkd => "HKD",
            Self::Hrk => "HRK",
            Self::Huf => "HUF",
            Self::Idr => "IDR",
            Self::Ils => "ILS",
            Self::Inr => "INR",
            Self::Jpy => "JPY",
            Self::Kes => "KES",
            Self::Krw => "KRW",
            Self::Lkr => "LKR",
            Self::Mad => "MAD",
            Self::Mxn => "MXN",
            Self::Myr => "MYR",
            Self::Ngn => "NGN",
            Self::Nok => "NOK",
            Self::Npr => "NPR",
            Self::Nzd => "NZD",
            Self::Pen => "PEN",
            Self::Php => "PHP",
            Self::Pkr => "PKR",
            Self::Pln => "PLN",
            Self::Ron => "RON",
            Self::Rub => "RUB",
            Self::Sek => "SEK",
            Self::Sgd => "SGD",
            Self::Thb => "THB",
            Self::Try => "TRY",
            Self::Tzs => "TZS",
            Self::Uah => "UAH",
            Self::Ugx => "UGX",
            Self::Usd => "USD",
            Self::Vnd => "VND",
            Self::Zar => "ZAR",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aed => "Emirati dirham",
            Self::Ars => "Argentine peso",
            Self::Aud => "Australian dollar",
            Self::Bdt => "Bangladeshi taka",
            Self::Bgn => "Bulgarian lev",
            Self::Brl => "Brazilian real",
            Self::Cad => "Canadian dollar",
            Self::Chf => "Swiss franc",
            Self::Clp => "Chilean peso",
            Self::Cny => "Chinese yuan",
            Self::Czk => "Czech koruna",
            Self::Dkk => "Danish krone",
            Self::Egp => "Egyptian pound",
            Self::Eur => "Euro",
            Self::Gbp => "British pound",
            Self::Gel => "Georgian lari",
            Self::Ghs => "Ghanaian cedi",
            Self::Hkd => "Hong Kong dollar",
            Self::Hrk => "Croatian kuna",
            Self::Huf => "Hungarian forint",
            Self::Idr => "Indonesian rupiah",
            Self::Ils => "Israeli new shekel",
            Self::Inr => "Indian rupee",
            Self::Jpy => "Japanese yen",
            Self::Kes => "Kenyan shilling",
            Self::Krw => "South Korean won",
            Self::Lkr => "Sri Lankan rupee",
            Self::Mad => "Moroccan dirham",
            Self::Mxn => "Mexican peso",
            Self::Myr => "Malaysian ringgit",
            Self::Ngn => "Nigerian naira",
            Self::Nok => "Norwegian krone",
            Self::Npr => "Nepalese rupee",
            Self::Nzd => "New Zealand dollar",
            Self::Pen => "Peruvian sol",
            Self::Php => "Philippine peso",
            Self::Pkr => "Pakistani rupee",
            Self::Pln => "Polish zloty",
            Self::Ron => "Romanian leu",
            Self::Rub => "Russian ruble",
            Self::Sek => "Swedish krona",
            Self::Sgd => "Singapore dollar",
            Self::Thb => "Thai baht",
            Self::Try => "Turkish lira",
            Self::Tzs => "Tanzanian shilling",
            Self::Uah => "Ukrainian hryvnia",
            Self::Ugx => "Ugandan shilling",
            Self::Usd => "United States dollar",
            Self::Vnd => "Vietnamese dong",
            Self::Zar => "South African rand",
        }
    }

    /// Display label, e.g. `EUR - Euro`
    pub fn label(&self) -> String {
        format!("{} - {}", self.code(), self.name())
    }

    /// Banking fields collected when paying out in this currency
    pub fn branch(&self) -> Branch {
        let branch = Branch::new(self.code());
        match self {
            Self::Aed
            | Self::Bgn
            | Self::Chf
            | Self::Czk
            | Self::Dkk
            | Self::Eur
            | Self::Gbp
            | Self::Gel
            | Self::Hrk
            | Self::Huf
            | Self::Ils
            | Self::Nok
            | Self::Pkr
            | Self::Pln
            | Self::Ron
            | Self::Sek
            | Self::Try => branch.required(iban()),

            Self::Egp
            | Self::Ghs
            | Self::Idr
            | Self::Myr
            | Self::Ngn
            | Self::Npr
            | Self::Nzd
            | Self::Php
            | Self::Sgd
            | Self::Thb
            | Self::Tzs
            | Self::Ugx => branch
                .required(bank_name())
                .required(account_number("Account Number")),

            Self::Bdt | Self::Lkr | Self::Vnd => branch
                .required(bank_name())
                .required(FieldDescriptor::text("branch_name", "Branch Name"))
                .required(account_number("Account Number")),

            Self::Ars => branch
                .required(FieldDescriptor::text("tax_id", "Tax ID (CUIL, CUIT)"))
                .required(account_number("Account Number (CBU)")),

            Self::Aud => branch
                .required(FieldDescriptor::text("bbs_code", "BBS Code"))
                .required(account_number("Account Number")),

            Self::Brl => branch
                .required(bank_name())
                .required(FieldDescriptor::text("branch_code", "Branch Code"))
                .required(checking_or_savings())
                .required(account_number("Account Number"))
                .required(FieldDescriptor::text(
                    "recipient_phone_number",
                    "Recipient Phone Number",
                ))
                .required(FieldDescriptor::text(
                    "recipient_tax_registration_number",
                    "Recipient Tax Registration Number (CPF)",
                )),

            Self::Cad => branch
                .required(FieldDescriptor::text(
                    "bank_institution_number",
                    "Bank Institution Number",
                ))
                .required(FieldDescriptor::text(
                    "branch_transit_number",
                    "Branch Transit Number",
                ))
                .required(account_number("Account Number"))
                .required(checking_or_savings()),

            Self::Clp => branch
                .required(bank_name())
                .required(FieldDescriptor::text("bank_code", "Bank Code"))
                .required(account_number("Account Number"))
                .required(FieldDescriptor::text("account_type", "Account Type"))
                .required(FieldDescriptor::text(
                    "recipient_rut_number",
                    "Recipient's Rol Unico Tributario",
                ))
                .required(FieldDescriptor::text(
                    "recipient_phone_number",
                    "Recipient's Phone Number",
                )),

            Self::Cny => branch.required(FieldDescriptor::text(
                "unionpay_card_number",
                "UnionPay Card Number",
            )),

            Self::Hkd => branch
                .required(bank_name())
                .required(account_number("Account Number (12 digits!)")),

            Self::Inr => branch
                .required(FieldDescriptor::text("ifsc_code", "IFSC Code"))
                .required(account_number("Account Number")),

            Self::Jpy => branch
                .required(FieldDescriptor::text(
                    "recipient_name_latin",
                    "Recipient Name (Latin characters)",
                ))
                .required(FieldDescriptor::text(
                    "recipient_name_katakana",
                    "Recipient Name (Katakana characters)",
                ))
                .required(bank_name())
                .required(FieldDescriptor::text("branch_name", "Branch Name"))
                .required(account_number("Account Number"))
                .required(FieldDescriptor::plain_choice(
                    "account_type",
                    "Account Type",
                    &["Futsuu", "Chochiku", "Touza"],
                )),

            Self::Kes => branch
                .required(bank_name())
                .required(FieldDescriptor::text("account_name", "Account Name"))
                .required(account_number("Account Number")),

            Self::Krw => branch
                .required(FieldDescriptor::date("date_of_birth", "Date of Birth"))
                .required(account_number("Account Number"))
                .required(FieldDescriptor::text("bank_name", "Bank Name/Code")),

            Self::Mad => branch
                .required(swift_number())
                .required(account_number("Account Number (RIB)")),

            Self::Mxn => branch.required(FieldDescriptor::text("clabe", "CLABE")),

            Self::Pen => branch
                .required(bank_name())
                .required(FieldDescriptor::text("bank_code", "Bank Code"))
                .required(account_number("Account Number"))
                .required(checking_or_savings())
                .required(FieldDescriptor::text(
                    "recipient_phone_number",
                    "Recipient Phone Number",
                ))
                .required(FieldDescriptor::text(
                    "recipient_identification_doc_type",
                    "Recipient ID Document Type",
                ))
                .required(FieldDescriptor::text(
                    "recipient_identification_number",
                    "Recipient Identification Number",
                )),

            Self::Rub => branch
                .required(account_number("Account Number"))
                .required(FieldDescriptor::text("bik", "BIK"))
                .required(FieldDescriptor::text("region", "Region")),

            Self::Uah => branch
                .required(FieldDescriptor::text(
                    "recipient_phone_number",
                    "Recipient Phone Number",
                ))
                .required(FieldDescriptor::text(
                    "uah_privatbank_card",
                    "UAH PrivatBank Card (last 4 digits only)",
                )),

            Self::Usd => branch
                .required(FieldDescriptor::plain_choice(
                    "payment_method",
                    "Payment Method",
                    &[ACH, CHECK_BY_POST],
                ))
                .with_dependency(usd_payment_methods()),

            Self::Zar => branch
                .required(swift_number())
                .required(account_number("Account Number")),
        }
    }
}

const ACH: &str = "ACH";
const CHECK_BY_POST: &str = "Check by post";

fn usd_payment_methods() -> Dependency {
    Dependency::new(
        "payment_method",
        vec![
            Branch::new(ACH)
                .required(FieldDescriptor::text("routing_number", "Routing Number (ABA)"))
                .required(account_number("Account Number")),
            Branch::new(CHECK_BY_POST)
                .required(FieldDescriptor::text("address_line_one", "Address Line 1"))
                .field(FieldDescriptor::text("address_line_two", "Address Line 2"))
                .required(FieldDescriptor::text("address_city", "City"))
                .field(FieldDescriptor::text("address_state", "State"))
                .required(FieldDescriptor::text("address_postalcode", "Postal Code"))
                .field(FieldDescriptor::text("address_country", "Country")),
        ],
    )
}

fn iban() -> FieldDescriptor {
    FieldDescriptor::text("iban", "IBAN")
}

fn bank_name() -> FieldDescriptor {
    FieldDescriptor::text("bank_name", "Bank Name")
}

fn swift_number() -> FieldDescriptor {
    FieldDescriptor::text("swift_number", "BIC/SWIFT Number")
}

fn account_number(title: &str) -> FieldDescriptor {
    FieldDescriptor::text("account_number", title)
}

fn checking_or_savings() -> FieldDescriptor {
    FieldDescriptor::plain_choice("account_type", "Account Type", &["checking", "savings"])
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == s)
            .ok_or_else(|| SchemaError::UnknownCurrency(s.to_string()))
    }
}
