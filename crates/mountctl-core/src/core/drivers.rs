//! Known driver tags and their default settings
//!
//! The store accepts any driver string; this catalog only helps operators
//! pick a valid tag and start from sensible `addition` defaults.

use crate::store::Addition;
use serde_json::{Value, json};

const DRIVERS: &[&str] = &[
    // local and network protocols
    "Local",
    "Ftp",
    "Sftp",
    "Webdav",
    "S3",
    "Smb",
    // domestic cloud drives
    "BaiduNetdisk",
    "Aliyundrive",
    "AliyundriveOpen",
    "AliyundriveShare",
    "115",
    "115Open",
    "115Share",
    "Weiyun",
    "189",
    "189TV",
    "189PC",
    "Quark",
    "QuarkOpen",
    "QuarkUC",
    "QuarkUCTV",
    "PikPak",
    "PikPakShare",
    "Terabox",
    "Mopan",
    "Wopan",
    // international cloud drives
    "Onedrive",
    "OnedriveApp",
    "OnedriveSharelink",
    "GoogleDrive",
    "Dropbox",
    "Mega",
    "YandexDisk",
    "Mediafire",
    "ProtonDrive",
    // developer and special purpose
    "Github",
    "GithubReleases",
    "Teambition",
    "Teldrive",
    "Lanzou",
    "Ilanzou",
    "Chaoxing",
    "NeteaseMusic",
    "Cloudreve",
    "CloudreveV4",
    "Kodbox",
    // virtual
    "Alias",
    "Virtual",
    "Crypt",
    "Chunk",
    "Strm",
    "UrlTree",
];

/// All known driver tags, sorted
pub fn supported_drivers() -> Vec<&'static str> {
    let mut drivers = DRIVERS.to_vec();
    drivers.sort_unstable();
    drivers
}

pub fn is_known_driver(driver: &str) -> bool {
    DRIVERS.contains(&driver)
}

/// Key in `addition` that holds the credential rotated for this driver
pub fn credential_key(driver: &str) -> Option<&'static str> {
    match driver {
        "BaiduNetdisk" | "Aliyundrive" | "AliyundriveOpen" | "115Open" | "Onedrive"
        | "OnedriveApp" | "GoogleDrive" | "Dropbox" | "PikPak" | "Teambition" => {
            Some("refresh_token")
        }
        "Quark" | "QuarkUC" | "115" | "189PC" | "Weiyun" => Some("cookie"),
        "Webdav" | "Ftp" | "Sftp" | "Smb" | "Mega" => Some("password"),
        "S3" => Some("secret_access_key"),
        "Github" | "GithubReleases" => Some("token"),
        _ => None,
    }
}

/// Cookie fields a logged-in browser session is expected to carry
pub fn important_cookie_fields(driver: &str) -> &'static [&'static str] {
    match driver {
        "Quark" | "QuarkUC" => &[
            "b-user-id",
            "ctoken",
            "isQuark",
            "grey-id",
            "web-grey-id",
            "__pus",
            "__kp",
            "__uid",
        ],
        "115" => &["UID", "CID", "SEID"],
        "BaiduNetdisk" => &["BDUSS", "STOKEN"],
        _ => &[],
    }
}

/// Default `addition` for drivers with a known settings layout.
///
/// Credential fields are present but empty; they are filled in by the
/// operator, never shipped as literals.
pub fn template(driver: &str) -> Option<Addition> {
    let value = match driver {
        "Local" => json!({"root_folder_path": "/"}),
        "Webdav" => json!({"url": "", "username": "", "password": ""}),
        "S3" => json!({
            "access_key_id": "",
            "secret_access_key": "",
            "endpoint": "",
            "bucket": ""
        }),
        "Aliyundrive" => json!({"refresh_token": "", "root_id": "root"}),
        "BaiduNetdisk" => json!({
            "refresh_token": "",
            "root_path": "/",
            "order_by": "name",
            "order_direction": "asc",
            "download_api": "official",
            "use_online_api": true,
            "api_url_address": "https://api.oplist.org/baiduyun/renewapi",
            "custom_crack_ua": "netdisk",
            "upload_thread": "3",
            "upload_timeout": 60,
            "upload_api": "https://d.pcs.baidu.com",
            "use_dynamic_upload_api": true,
            "custom_upload_part_size": 0,
            "low_bandwith_upload_mode": false,
            "only_list_video_file": false
        }),
        "Quark" => json!({
            "cookie": "",
            "root_id": "0",
            "order_by": "none",
            "order_direction": "asc",
            "use_transcoding_address": false,
            "only_list_video_file": false,
            "addition_version": 0
        }),
        _ => return None,
    };

    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Template overlaid with the operator's values. Supplied keys win.
pub fn apply_template(driver: &str, supplied: Addition) -> Addition {
    let mut merged = template(driver).unwrap_or_default();
    merged.extend(supplied);
    merged
}
