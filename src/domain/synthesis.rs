//! Signal synthesis: per-indicator interpretation, market-condition
//! classification and the weighted trading recommendation.
//!
//! Interpretations apply fixed threshold bands with divergence as an
//! override. The aggregate signal weighs seven indicator families
//! (RSI 15, MACD 20, Stochastic 10, Bollinger 10, ADX 15, Ichimoku 15,
//! Volume 15) into a net score in [-1, 1]; action thresholds are ±0.15
//! and ±0.4.

use serde::{Deserialize, Serialize};

use super::analysis::{Divergence, IndicatorAnalysis, Signal, Strength};
use super::error::EngineError;
use super::indicator::{
    self, AdxOutput, BollingerOutput, CloudPosition, IchimokuOutput, MacdOutput, StochasticOutput,
};
use super::levels::{detect_levels, LevelConfig, LevelMap};
use super::ohlcv::{closes, validate_series, OhlcvBar, Quote};

const WEIGHT_RSI: f64 = 15.0;
const WEIGHT_MACD: f64 = 20.0;
const WEIGHT_STOCHASTIC: f64 = 10.0;
const WEIGHT_BOLLINGER: f64 = 10.0;
const WEIGHT_ADX: f64 = 15.0;
const WEIGHT_ICHIMOKU: f64 = 15.0;
const WEIGHT_VOLUME: f64 = 15.0;
const TOTAL_WEIGHT: f64 = 100.0;

const OBV_TREND_BARS: usize = 10;
const TARGET_FALLBACK_PCT: f64 = 0.05;

/// Raw indicator values bundled for collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: MacdOutput,
    pub stochastic: StochasticOutput,
    pub bollinger: BollingerOutput,
    pub atr: f64,
    pub adx: AdxOutput,
    pub ichimoku: IchimokuOutput,
    pub obv: f64,
    pub vwap: f64,
    pub williams_r: f64,
    pub cci: f64,
    pub sma_20: f64,
    pub sma_50: f64,
}

/// Tagged analyses for the seven weighted indicator families plus the
/// unweighted Williams %R and CCI reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorAnalyses {
    pub rsi: IndicatorAnalysis,
    pub macd: IndicatorAnalysis,
    pub stochastic: IndicatorAnalysis,
    pub bollinger: IndicatorAnalysis,
    pub adx: IndicatorAnalysis,
    pub ichimoku: IndicatorAnalysis,
    pub volume: IndicatorAnalysis,
    pub williams_r: IndicatorAnalysis,
    pub cci: IndicatorAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Volatility {
    High,
    Normal,
    Low,
    Contracting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Momentum {
    StrongBullish,
    Bullish,
    Flat,
    Bearish,
    StrongBearish,
}

/// Trend read from ADX: direction from DI dominance, tier from the ADX
/// value; no tier means sideways.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendCondition {
    pub direction: Signal,
    pub strength: Option<Strength>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCondition {
    pub trend: TrendCondition,
    pub volatility: Volatility,
    pub momentum: Momentum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingRecommendation {
    pub action: Action,
    /// 0–100, from |net score|.
    pub confidence: u8,
    /// (bullish weight − bearish weight) / total weight, in [-1, 1].
    pub score: f64,
    pub target_support: f64,
    pub target_resistance: f64,
    pub risk_reward: f64,
    pub reasons: Vec<String>,
}

/// The full bundle handed to UI/storage collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    pub symbol: String,
    pub snapshot: IndicatorSnapshot,
    pub analyses: IndicatorAnalyses,
    pub interpretations: Vec<String>,
    pub condition: MarketCondition,
    pub levels: LevelMap,
    pub recommendation: TradingRecommendation,
}

/// Run the whole pipeline for one symbol. Fails only on an empty or
/// malformed series; short series degrade per indicator.
pub fn analyze(
    symbol: &str,
    bars: &[OhlcvBar],
    quote: &Quote,
    config: &LevelConfig,
) -> Result<TechnicalAnalysis, EngineError> {
    validate_series(bars)?;
    let close_values = closes(bars);
    let current_price = if quote.price > 0.0 {
        quote.price
    } else {
        close_values[close_values.len() - 1]
    };

    let snapshot = IndicatorSnapshot {
        rsi: indicator::rsi(&close_values, indicator::rsi::DEFAULT_PERIOD),
        macd: indicator::macd(&close_values),
        stochastic: indicator::stochastic(
            bars,
            indicator::stochastic::DEFAULT_K,
            indicator::stochastic::DEFAULT_D,
        ),
        bollinger: indicator::bollinger(
            &close_values,
            indicator::bollinger::DEFAULT_PERIOD,
            indicator::bollinger::DEFAULT_MULT,
        ),
        atr: indicator::atr(bars, indicator::atr::DEFAULT_PERIOD),
        adx: indicator::adx(bars, indicator::adx::DEFAULT_PERIOD),
        ichimoku: indicator::ichimoku(bars),
        obv: indicator::obv(bars),
        vwap: indicator::vwap(bars),
        williams_r: indicator::williams_r(bars, indicator::williams::DEFAULT_PERIOD),
        cci: indicator::cci(bars, indicator::cci::DEFAULT_PERIOD),
        sma_20: indicator::sma(&close_values, 20),
        sma_50: indicator::sma(&close_values, 50),
    };

    let (rsi_analysis, rsi_text) = analyze_rsi(&close_values, snapshot.rsi);
    let (macd_analysis, macd_text) = analyze_macd(&close_values, snapshot.macd);
    let (stoch_analysis, stoch_text) = analyze_stochastic(bars, snapshot.stochastic);
    let (boll_analysis, boll_text) = analyze_bollinger(&close_values, snapshot.bollinger);
    let (adx_analysis, adx_text) = analyze_adx(snapshot.adx);
    let (ichimoku_analysis, ichimoku_text) = analyze_ichimoku(bars);
    let (volume_analysis, volume_text) = analyze_volume(bars);
    let (williams_analysis, williams_text) = analyze_williams(snapshot.williams_r);
    let (cci_analysis, cci_text) = analyze_cci(snapshot.cci);

    let analyses = IndicatorAnalyses {
        rsi: rsi_analysis,
        macd: macd_analysis,
        stochastic: stoch_analysis,
        bollinger: boll_analysis,
        adx: adx_analysis,
        ichimoku: ichimoku_analysis,
        volume: volume_analysis,
        williams_r: williams_analysis,
        cci: cci_analysis,
    };

    let interpretations = vec![
        rsi_text,
        macd_text,
        stoch_text,
        boll_text,
        adx_text,
        ichimoku_text,
        volume_text,
        williams_text,
        cci_text,
    ];

    let condition = market_condition(&close_values, &snapshot);
    let levels = detect_levels(bars, current_price, config);
    let recommendation =
        recommend(&analyses, &interpretations, &levels, current_price);

    Ok(TechnicalAnalysis {
        symbol: symbol.to_string(),
        snapshot,
        analyses,
        interpretations,
        condition,
        levels,
        recommendation,
    })
}

pub fn analyze_rsi(close_values: &[f64], rsi: f64) -> (IndicatorAnalysis, String) {
    let divergence = indicator::rsi_divergence(close_values, indicator::rsi::DEFAULT_PERIOD);

    let (signal, strength, text) = match divergence {
        Divergence::Bullish => (
            Signal::Bullish,
            Strength::Strong,
            format!("RSI {rsi:.1} with bullish divergence: selling pressure fading"),
        ),
        Divergence::Bearish => (
            Signal::Bearish,
            Strength::Strong,
            format!("RSI {rsi:.1} with bearish divergence: rally losing momentum"),
        ),
        Divergence::None => {
            if rsi > 80.0 {
                (
                    Signal::Bearish,
                    Strength::Strong,
                    format!("RSI {rsi:.1}: extremely overbought"),
                )
            } else if rsi > 70.0 {
                (
                    Signal::Bearish,
                    Strength::Moderate,
                    format!("RSI {rsi:.1}: overbought"),
                )
            } else if rsi > 60.0 {
                (
                    Signal::Bullish,
                    Strength::Moderate,
                    format!("RSI {rsi:.1}: bullish momentum"),
                )
            } else if rsi >= 40.0 {
                (
                    Signal::Neutral,
                    Strength::Weak,
                    format!("RSI {rsi:.1}: neutral"),
                )
            } else if rsi >= 30.0 {
                (
                    Signal::Bearish,
                    Strength::Moderate,
                    format!("RSI {rsi:.1}: bearish momentum"),
                )
            } else if rsi >= 20.0 {
                (
                    Signal::Bullish,
                    Strength::Moderate,
                    format!("RSI {rsi:.1}: oversold"),
                )
            } else {
                (
                    Signal::Bullish,
                    Strength::Strong,
                    format!("RSI {rsi:.1}: extremely oversold"),
                )
            }
        }
    };

    (
        IndicatorAnalysis {
            value: rsi,
            signal,
            strength,
            divergence,
        },
        text,
    )
}

pub fn analyze_macd(close_values: &[f64], macd: MacdOutput) -> (IndicatorAnalysis, String) {
    let divergence = indicator::macd_divergence(close_values);
    let crossover = indicator::macd_crossover(close_values);

    let (signal, strength, text) = match divergence {
        Divergence::Bullish => (
            Signal::Bullish,
            Strength::Strong,
            "MACD bullish divergence: downtrend weakening".to_string(),
        ),
        Divergence::Bearish => (
            Signal::Bearish,
            Strength::Strong,
            "MACD bearish divergence: uptrend weakening".to_string(),
        ),
        Divergence::None => match crossover {
            Signal::Bullish => (
                Signal::Bullish,
                Strength::Strong,
                "MACD bullish crossover: histogram turned positive".to_string(),
            ),
            Signal::Bearish => (
                Signal::Bearish,
                Strength::Strong,
                "MACD bearish crossover: histogram turned negative".to_string(),
            ),
            Signal::Neutral => {
                if macd.histogram > 0.0 {
                    (
                        Signal::Bullish,
                        Strength::Moderate,
                        "MACD above signal line".to_string(),
                    )
                } else if macd.histogram < 0.0 {
                    (
                        Signal::Bearish,
                        Strength::Moderate,
                        "MACD below signal line".to_string(),
                    )
                } else {
                    (Signal::Neutral, Strength::Weak, "MACD flat".to_string())
                }
            }
        },
    };

    (
        IndicatorAnalysis {
            value: macd.histogram,
            signal,
            strength,
            divergence,
        },
        text,
    )
}

pub fn analyze_stochastic(
    bars: &[OhlcvBar],
    stoch: StochasticOutput,
) -> (IndicatorAnalysis, String) {
    // Crossover checked against the prior bar's %K/%D.
    let crossover = if bars.len() > 1 {
        let prev = indicator::stochastic(
            &bars[..bars.len() - 1],
            indicator::stochastic::DEFAULT_K,
            indicator::stochastic::DEFAULT_D,
        );
        if prev.k <= prev.d && stoch.k > stoch.d {
            Signal::Bullish
        } else if prev.k >= prev.d && stoch.k < stoch.d {
            Signal::Bearish
        } else {
            Signal::Neutral
        }
    } else {
        Signal::Neutral
    };

    let (signal, strength, text) = match crossover {
        Signal::Bullish if stoch.k < 20.0 => (
            Signal::Bullish,
            Strength::Strong,
            format!("Stochastic %K {:.1} crossed above %D in oversold zone", stoch.k),
        ),
        Signal::Bearish if stoch.k > 80.0 => (
            Signal::Bearish,
            Strength::Strong,
            format!("Stochastic %K {:.1} crossed below %D in overbought zone", stoch.k),
        ),
        Signal::Bullish => (
            Signal::Bullish,
            Strength::Moderate,
            format!("Stochastic bullish crossover at %K {:.1}", stoch.k),
        ),
        Signal::Bearish => (
            Signal::Bearish,
            Strength::Moderate,
            format!("Stochastic bearish crossover at %K {:.1}", stoch.k),
        ),
        Signal::Neutral => {
            if stoch.k > 80.0 {
                (
                    Signal::Bearish,
                    Strength::Moderate,
                    format!("Stochastic %K {:.1}: overbought", stoch.k),
                )
            } else if stoch.k < 20.0 {
                (
                    Signal::Bullish,
                    Strength::Moderate,
                    format!("Stochastic %K {:.1}: oversold", stoch.k),
                )
            } else {
                (
                    Signal::Neutral,
                    Strength::Weak,
                    format!("Stochastic %K {:.1}: mid-range", stoch.k),
                )
            }
        }
    };

    (
        IndicatorAnalysis {
            value: stoch.k,
            signal,
            strength,
            divergence: Divergence::None,
        },
        text,
    )
}

pub fn analyze_bollinger(
    close_values: &[f64],
    bands: BollingerOutput,
) -> (IndicatorAnalysis, String) {
    let squeeze = indicator::is_squeeze(
        close_values,
        indicator::bollinger::DEFAULT_PERIOD,
        indicator::bollinger::DEFAULT_MULT,
    );

    let (signal, strength, text) = if bands.percent_b > 1.0 {
        (
            Signal::Bearish,
            Strength::Strong,
            "Price closed above the upper Bollinger band".to_string(),
        )
    } else if bands.percent_b > 0.8 {
        (
            Signal::Bearish,
            Strength::Moderate,
            "Price pressing the upper Bollinger band".to_string(),
        )
    } else if bands.percent_b < 0.0 {
        (
            Signal::Bullish,
            Strength::Strong,
            "Price closed below the lower Bollinger band".to_string(),
        )
    } else if bands.percent_b < 0.2 {
        (
            Signal::Bullish,
            Strength::Moderate,
            "Price pressing the lower Bollinger band".to_string(),
        )
    } else if squeeze {
        (
            Signal::Neutral,
            Strength::Moderate,
            "Bollinger squeeze: volatility contraction, breakout pending".to_string(),
        )
    } else {
        (
            Signal::Neutral,
            Strength::Weak,
            "Price inside the Bollinger bands".to_string(),
        )
    };

    (
        IndicatorAnalysis {
            value: bands.percent_b,
            signal,
            strength,
            divergence: Divergence::None,
        },
        text,
    )
}

pub fn analyze_adx(adx: AdxOutput) -> (IndicatorAnalysis, String) {
    let strength = trend_tier(adx.adx);
    let direction = if strength.is_none() {
        Signal::Neutral
    } else if adx.plus_di > adx.minus_di {
        Signal::Bullish
    } else if adx.minus_di > adx.plus_di {
        Signal::Bearish
    } else {
        Signal::Neutral
    };

    let text = match (direction, strength) {
        (Signal::Neutral, _) => format!("ADX {:.1}: no meaningful trend", adx.adx),
        (Signal::Bullish, Some(tier)) => {
            format!("ADX {:.1}: {tier:?} uptrend (+DI leading)", adx.adx)
        }
        (Signal::Bearish, Some(tier)) => {
            format!("ADX {:.1}: {tier:?} downtrend (-DI leading)", adx.adx)
        }
        _ => format!("ADX {:.1}", adx.adx),
    };

    (
        IndicatorAnalysis {
            value: adx.adx,
            signal: direction,
            strength: strength.unwrap_or(Strength::Weak),
            divergence: Divergence::None,
        },
        text,
    )
}

/// ADX tiers: >40 strong, >25 moderate, >20 weak, else absent.
pub fn trend_tier(adx: f64) -> Option<Strength> {
    if adx > 40.0 {
        Some(Strength::Strong)
    } else if adx > 25.0 {
        Some(Strength::Moderate)
    } else if adx > 20.0 {
        Some(Strength::Weak)
    } else {
        None
    }
}

pub fn analyze_ichimoku(bars: &[OhlcvBar]) -> (IndicatorAnalysis, String) {
    let out = indicator::ichimoku(bars);
    let position = indicator::cloud_position(bars);

    let (signal, strength, text) = match position {
        CloudPosition::Above => {
            let tier = if out.tenkan > out.kijun {
                Strength::Strong
            } else {
                Strength::Moderate
            };
            (signal_from_cloud(position), tier, "Price above the Ichimoku cloud".to_string())
        }
        CloudPosition::Below => {
            let tier = if out.tenkan < out.kijun {
                Strength::Strong
            } else {
                Strength::Moderate
            };
            (signal_from_cloud(position), tier, "Price below the Ichimoku cloud".to_string())
        }
        CloudPosition::Inside => (
            Signal::Neutral,
            Strength::Weak,
            "Price inside the Ichimoku cloud".to_string(),
        ),
    };

    (
        IndicatorAnalysis {
            value: out.senkou_a,
            signal,
            strength,
            divergence: Divergence::None,
        },
        text,
    )
}

fn signal_from_cloud(position: CloudPosition) -> Signal {
    match position {
        CloudPosition::Above => Signal::Bullish,
        CloudPosition::Below => Signal::Bearish,
        CloudPosition::Inside => Signal::Neutral,
    }
}

pub fn analyze_volume(bars: &[OhlcvBar]) -> (IndicatorAnalysis, String) {
    let series = indicator::obv_series(bars);
    if series.len() <= OBV_TREND_BARS || bars.iter().all(|b| b.volume == 0.0) {
        return (
            IndicatorAnalysis::neutral(0.0),
            "Volume: insufficient data".to_string(),
        );
    }
    let obv_now = series[series.len() - 1];
    let obv_then = series[series.len() - 1 - OBV_TREND_BARS];
    let price_now = bars[bars.len() - 1].close;
    let price_then = bars[bars.len() - 1 - OBV_TREND_BARS].close;

    let obv_up = obv_now > obv_then;
    let price_up = price_now > price_then;

    let (signal, strength, divergence, text) = match (obv_up, price_up) {
        (true, true) => (
            Signal::Bullish,
            Strength::Moderate,
            Divergence::None,
            "OBV rising with price: advance is supported by volume".to_string(),
        ),
        (false, false) => (
            Signal::Bearish,
            Strength::Moderate,
            Divergence::None,
            "OBV falling with price: decline is supported by volume".to_string(),
        ),
        (false, true) => (
            Signal::Bearish,
            Strength::Weak,
            Divergence::Bearish,
            "OBV lagging a rising price: volume not confirming".to_string(),
        ),
        (true, false) => (
            Signal::Bullish,
            Strength::Weak,
            Divergence::Bullish,
            "OBV rising against a falling price: accumulation".to_string(),
        ),
    };

    (
        IndicatorAnalysis {
            value: obv_now,
            signal,
            strength,
            divergence,
        },
        text,
    )
}

pub fn analyze_williams(williams_r: f64) -> (IndicatorAnalysis, String) {
    let (signal, strength, text) = if williams_r > -10.0 {
        (
            Signal::Bearish,
            Strength::Strong,
            format!("Williams %R {williams_r:.1}: extremely overbought"),
        )
    } else if williams_r > -20.0 {
        (
            Signal::Bearish,
            Strength::Moderate,
            format!("Williams %R {williams_r:.1}: overbought"),
        )
    } else if williams_r < -90.0 {
        (
            Signal::Bullish,
            Strength::Strong,
            format!("Williams %R {williams_r:.1}: extremely oversold"),
        )
    } else if williams_r < -80.0 {
        (
            Signal::Bullish,
            Strength::Moderate,
            format!("Williams %R {williams_r:.1}: oversold"),
        )
    } else {
        (
            Signal::Neutral,
            Strength::Weak,
            format!("Williams %R {williams_r:.1}: mid-range"),
        )
    };

    (
        IndicatorAnalysis {
            value: williams_r,
            signal,
            strength,
            divergence: Divergence::None,
        },
        text,
    )
}

pub fn analyze_cci(cci: f64) -> (IndicatorAnalysis, String) {
    let (signal, strength, text) = if cci > 200.0 {
        (
            Signal::Bearish,
            Strength::Strong,
            format!("CCI {cci:.1}: extreme overbought, reversal risk"),
        )
    } else if cci > 100.0 {
        (
            Signal::Bearish,
            Strength::Moderate,
            format!("CCI {cci:.1}: overbought"),
        )
    } else if cci < -200.0 {
        (
            Signal::Bullish,
            Strength::Strong,
            format!("CCI {cci:.1}: extreme oversold, reversal setup"),
        )
    } else if cci < -100.0 {
        (
            Signal::Bullish,
            Strength::Moderate,
            format!("CCI {cci:.1}: oversold"),
        )
    } else {
        (
            Signal::Neutral,
            Strength::Weak,
            format!("CCI {cci:.1}: inside the normal band"),
        )
    };

    (
        IndicatorAnalysis {
            value: cci,
            signal,
            strength,
            divergence: Divergence::None,
        },
        text,
    )
}

/// Classify the market regime from ADX, Bollinger bandwidth and the
/// MACD-histogram/RSI pairing.
pub fn market_condition(close_values: &[f64], snapshot: &IndicatorSnapshot) -> MarketCondition {
    let strength = trend_tier(snapshot.adx.adx);
    let direction = if strength.is_none() {
        Signal::Neutral
    } else if snapshot.adx.plus_di > snapshot.adx.minus_di {
        Signal::Bullish
    } else {
        Signal::Bearish
    };

    let squeeze = indicator::is_squeeze(
        close_values,
        indicator::bollinger::DEFAULT_PERIOD,
        indicator::bollinger::DEFAULT_MULT,
    );
    let volatility = if squeeze {
        Volatility::Contracting
    } else if snapshot.bollinger.bandwidth > 10.0 {
        Volatility::High
    } else if snapshot.bollinger.bandwidth < 4.0 {
        Volatility::Low
    } else {
        Volatility::Normal
    };

    let hist = snapshot.macd.histogram;
    let rsi_bias = snapshot.rsi - 50.0;
    let momentum = if hist > 0.0 && rsi_bias >= 5.0 {
        Momentum::StrongBullish
    } else if hist > 0.0 || rsi_bias >= 5.0 {
        Momentum::Bullish
    } else if hist < 0.0 && rsi_bias <= -5.0 {
        Momentum::StrongBearish
    } else if hist < 0.0 || rsi_bias <= -5.0 {
        Momentum::Bearish
    } else {
        Momentum::Flat
    };

    MarketCondition {
        trend: TrendCondition {
            direction,
            strength,
        },
        volatility,
        momentum,
    }
}

/// Weighted aggregation of the seven analyses into one recommendation.
pub fn recommend(
    analyses: &IndicatorAnalyses,
    interpretations: &[String],
    levels: &LevelMap,
    current_price: f64,
) -> TradingRecommendation {
    let weighted: [(&IndicatorAnalysis, f64); 7] = [
        (&analyses.rsi, WEIGHT_RSI),
        (&analyses.macd, WEIGHT_MACD),
        (&analyses.stochastic, WEIGHT_STOCHASTIC),
        (&analyses.bollinger, WEIGHT_BOLLINGER),
        (&analyses.adx, WEIGHT_ADX),
        (&analyses.ichimoku, WEIGHT_ICHIMOKU),
        (&analyses.volume, WEIGHT_VOLUME),
    ];

    let mut bullish = 0.0;
    let mut bearish = 0.0;
    let mut reasons = Vec::new();
    for (i, (analysis, weight)) in weighted.iter().enumerate() {
        match analysis.signal {
            Signal::Bullish => bullish += weight,
            Signal::Bearish => bearish += weight,
            Signal::Neutral => {}
        }
        if analysis.signal != Signal::Neutral {
            if let Some(text) = interpretations.get(i) {
                reasons.push(text.clone());
            }
        }
    }

    let score = (bullish - bearish) / TOTAL_WEIGHT;
    let action = if score > 0.4 {
        Action::StrongBuy
    } else if score > 0.15 {
        Action::Buy
    } else if score < -0.4 {
        Action::StrongSell
    } else if score < -0.15 {
        Action::Sell
    } else {
        Action::Neutral
    };
    let confidence = (score.abs() * 100.0).round().min(100.0) as u8;

    let target_support = levels
        .nearest_support(current_price)
        .map(|l| l.price)
        .unwrap_or(current_price * (1.0 - TARGET_FALLBACK_PCT));
    let target_resistance = levels
        .nearest_resistance(current_price)
        .map(|l| l.price)
        .unwrap_or(current_price * (1.0 + TARGET_FALLBACK_PCT));

    let downside = current_price - target_support;
    let risk_reward = if downside > 0.0 {
        (target_resistance - current_price) / downside
    } else {
        0.0
    };

    TradingRecommendation {
        action,
        confidence,
        score,
        target_support,
        target_resistance,
        risk_reward,
        reasons,
    }
}
