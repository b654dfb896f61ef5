use sha2::{Digest, Sha512};

use super::PaymentRequest;

/// Keyed digest over the ordered transaction fields. The pipe layout
/// (eleven value slots, five empty slots, then the salt) is the gateway's
/// wire contract and must match byte-for-byte.
pub fn payment_hash(fields: &PaymentRequest, salt: &str) -> String {
    let joined = format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}||||||{}",
        fields.key,
        fields.txnid,
        fields.amount,
        fields.productinfo,
        fields.firstname,
        fields.email,
        fields.udf1,
        fields.udf2,
        fields.udf3,
        fields.udf4,
        fields.udf5,
        salt
    );

    let mut hasher = Sha512::new();
    hasher.update(joined.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest {
            key: "merchant-key".to_string(),
            txnid: "inv-1".to_string(),
            amount: "17700".to_string(),
            productinfo: "Gold Membership".to_string(),
            firstname: "Asha".to_string(),
            email: String::new(),
            phone: "9876543210".to_string(),
            udf1: String::new(),
            udf2: String::new(),
            udf3: String::new(),
            udf4: String::new(),
            udf5: String::new(),
            salt: "salty".to_string(),
            surl: "https://backend.test/success".to_string(),
            furl: "https://backend.test/failure".to_string(),
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let fields = request();
        assert_eq!(payment_hash(&fields, "salty"), payment_hash(&fields, "salty"));
    }

    #[test]
    fn test_hash_matches_reference_digest() {
        let reference = {
            let mut hasher = Sha512::new();
            hasher.update(b"merchant-key|inv-1|17700|Gold Membership|Asha||||||||||||salty");
            format!("{:x}", hasher.finalize())
        };
        assert_eq!(payment_hash(&request(), "salty"), reference);
    }

    #[test]
    fn test_any_field_perturbation_changes_digest() {
        let base = payment_hash(&request(), "salty");

        let mut txn = request();
        txn.txnid = "inv-2".to_string();
        let mut amount = request();
        amount.amount = "17701".to_string();
        let mut product = request();
        product.productinfo = "Silver Membership".to_string();
        let mut name = request();
        name.firstname = "Usha".to_string();
        let mut udf = request();
        udf.udf5 = "x".to_string();

        for perturbed in [&txn, &amount, &product, &name, &udf] {
            assert_ne!(payment_hash(perturbed, "salty"), base);
        }
        assert_ne!(payment_hash(&request(), "other-salt"), base);
    }

    #[test]
    fn test_phone_and_urls_are_not_part_of_the_digest() {
        let base = payment_hash(&request(), "salty");

        let mut other = request();
        other.phone = "9999999999".to_string();
        other.surl = "https://elsewhere.test/s".to_string();
        assert_eq!(payment_hash(&other, "salty"), base);
    }
}
