mod common;

use common::{Behavior, FakeLimiter, FakeSms};
use std::sync::Arc;
use webook_adapter_sms::{FailoverSmsService, RateLimitSmsService, SmsError, SmsService};
use webook_common::RequestContext;

fn args() -> (Vec<String>, Vec<String>) {
    (vec!["123456".to_string()], vec!["+8613800000000".to_string()])
}

#[tokio::test]
async fn test_failover_falls_through_to_next_provider() {
    let a = FakeSms::new("a", Behavior::Fail);
    let b = FakeSms::new("b", Behavior::Ok);
    let failover = FailoverSmsService::new(vec![a.clone() as Arc<dyn SmsService>, b.clone()]);
    let (args, numbers) = args();

    failover
        .send(&RequestContext::background(), "tpl", &args, &numbers)
        .await
        .unwrap();

    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 1);
    assert_eq!(b.sent()[0].1, args);
}

#[tokio::test]
async fn test_failover_all_failed_tries_each_once() {
    let a = FakeSms::new("a", Behavior::Fail);
    let b = FakeSms::new("b", Behavior::Fail);
    let failover = FailoverSmsService::new(vec![a.clone() as Arc<dyn SmsService>, b.clone()]);
    let (args, numbers) = args();

    let err = failover
        .send(&RequestContext::background(), "tpl", &args, &numbers)
        .await
        .unwrap_err();

    assert!(matches!(err, SmsError::AllProvidersFailed { attempts: 2 }));
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 1);
}

#[tokio::test]
async fn test_failover_rotates_start_provider() {
    let a = FakeSms::new("a", Behavior::Ok);
    let b = FakeSms::new("b", Behavior::Ok);
    let failover = FailoverSmsService::new(vec![a.clone() as Arc<dyn SmsService>, b.clone()]);
    let (args, numbers) = args();
    let ctx = RequestContext::background();

    failover.send(&ctx, "tpl", &args, &numbers).await.unwrap();
    failover.send(&ctx, "tpl", &args, &numbers).await.unwrap();

    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 1);
}

#[tokio::test]
async fn test_failover_stops_on_cancellation() {
    let a = FakeSms::new("a", Behavior::Cancelled);
    let b = FakeSms::new("b", Behavior::Ok);
    let failover = FailoverSmsService::new(vec![a.clone() as Arc<dyn SmsService>, b.clone()]);
    let (args, numbers) = args();

    let err = failover
        .send(&RequestContext::background(), "tpl", &args, &numbers)
        .await
        .unwrap_err();

    assert!(matches!(err, SmsError::Cancelled));
    assert_eq!(b.calls(), 0);
}

#[tokio::test]
async fn test_failover_empty_list() {
    let failover = FailoverSmsService::new(Vec::new());
    let err = failover
        .send(&RequestContext::background(), "tpl", &[], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SmsError::AllProvidersFailed { attempts: 0 }));
    assert!(failover.is_empty());
}

#[tokio::test]
async fn test_rate_limited_send_skips_inner_provider() {
    let inner = FakeSms::new("a", Behavior::Ok);
    let sms = RateLimitSmsService::new(inner.clone(), Arc::new(FakeLimiter::Reject));
    let (args, numbers) = args();

    let err = sms
        .send(&RequestContext::background(), "tpl", &args, &numbers)
        .await
        .unwrap_err();

    assert!(matches!(err, SmsError::RateLimited));
    assert_eq!(inner.calls(), 0);
}

#[tokio::test]
async fn test_limiter_failure_skips_inner_provider() {
    let inner = FakeSms::new("a", Behavior::Ok);
    let sms = RateLimitSmsService::new(inner.clone(), Arc::new(FakeLimiter::Broken));
    let (args, numbers) = args();

    let err = sms
        .send(&RequestContext::background(), "tpl", &args, &numbers)
        .await
        .unwrap_err();

    assert!(matches!(err, SmsError::Limiter(_)));
    assert_eq!(inner.calls(), 0);
}

#[tokio::test]
async fn test_allowed_send_reaches_inner_provider() {
    let inner = FakeSms::new("a", Behavior::Ok);
    let sms = RateLimitSmsService::new(inner.clone(), Arc::new(FakeLimiter::Allow))
        .with_key("sms-limiter:test");
    let (args, numbers) = args();

    sms.send(&RequestContext::background(), "tpl", &args, &numbers)
        .await
        .unwrap();

    assert_eq!(inner.calls(), 1);
    assert_eq!(sms.name(), "a");
}

#[tokio::test]
async fn test_failover_resends_full_number_list() {
    let a = FakeSms::new("a", Behavior::Fail);
    let b = FakeSms::new("b", Behavior::Ok);
    let failover = FailoverSmsService::new(vec![a.clone() as Arc<dyn SmsService>, b.clone()]);
    let numbers = vec!["+8613800000001".to_string(), "+8613800000002".to_string()];

    failover
        .send(&RequestContext::background(), "tpl", &["1".to_string()], &numbers)
        .await
        .unwrap();

    assert_eq!(b.sent()[0].2, numbers);
}
