//! Associated projects a reimbursement can be filed against

pub const PROJECTS: &[&str] = &[
    "0 A.D.",
    "ankur.org.in",
    "aptosid",
    "Arch Linux",
    "Arch Linux 32",
    "ArduPilot",
    "Chakra",
    "Debian",
    "DebConf",
    "FFmpeg",
    "Fluxbox",
    "Gallery",
    "Glucosio",
    "GNUstep",
    "GNU TeXmacs",
    "haskell.org",
    "Jenkins",
    "LibreOffice",
    "MinGW",
    "NTPsec",
    "OFTC",
    "Open Bioinformatics Foundation",
    "Open MPI",
    "Open Voting Foundation",
    "OpenEmbedded",
    "OpenSAF",
    "OpenVAS",
    "OpenWrt",
    "OpenZFS",
    "Performance Co-Pilot",
    "PostgreSQL",
    "Privoxy",
    "Software in the Public Interest",
    "SproutCore",
    "Swathanthra Malayalam Computing",
    "The Mana World",
    "translatewiki",
    "systemd",
    "Tux4Kids",
    "X.Org",
    "YafaRay",
];
